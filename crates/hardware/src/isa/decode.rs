//! Trace Line Decoder.
//!
//! Turns one text line of the form `<hex address> <mnemonic> [operands...]`
//! into an [`Instruction`]. Fields are separated by whitespace; register
//! operands may carry a `$` prefix and a trailing comma.
//!
//! Mnemonics are matched by family prefix:
//!
//! | Prefix                   | Operands                          | Kind       |
//! |--------------------------|-----------------------------------|------------|
//! | `add`, `sll`, `ori`      | `rd, rs, rt-or-constant`          | `RType`    |
//! | `lui`                    | `rd, constant`                    | `RType`    |
//! | `lw`, `sw`               | `reg, offset(base), data-address` | `Load`/`Store` |
//! | `beq`                    | ignored                           | `Branch`   |
//! | `j` (`j`, `jal`, `jr`)   | ignored                           | `Jump`     |
//! | `syscall`                | none                              | `Syscall`  |
//! | `nop`                    | none                              | `Nop`      |
//!
//! Anything else is rejected as unsupported.

use crate::common::error::{ParseError, TraceError};
use crate::isa::abi;
use crate::isa::instruction::{Instruction, InstructionKind};

/// Number of general-purpose registers.
const NUM_REGS: u8 = 32;

/// Strips a `0x` or `0X` prefix.
fn strip_hex_prefix(text: &str) -> Option<&str> {
    text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
}

/// Parses a hexadecimal field with an optional `0x` prefix.
fn parse_hex(text: &str) -> Option<u32> {
    let digits = strip_hex_prefix(text).unwrap_or(text);
    u32::from_str_radix(digits, 16).ok()
}

/// Strips the trailing comma and the `$` sigil from an operand.
fn clean_operand(text: &str) -> &str {
    let text = text.strip_suffix(',').unwrap_or(text);
    text.strip_prefix('$').unwrap_or(text)
}

/// Parses a register operand: `$8`, `8,`, or `$t0`.
fn parse_register(text: &str) -> Result<u8, ParseError> {
    let name = clean_operand(text);
    let index = match name.parse::<u8>() {
        Ok(n) if n < NUM_REGS => Some(n),
        Ok(_) => None,
        Err(_) => abi::register_index(name),
    };
    index.ok_or_else(|| ParseError::InvalidOperand {
        operand: text.to_string(),
    })
}

/// Parses a signed constant in decimal or `0x` hexadecimal.
fn parse_constant(text: &str) -> Result<i32, ParseError> {
    let body = text.strip_suffix(',').unwrap_or(text);
    let (negative, magnitude) = body
        .strip_prefix('-')
        .map_or((false, body), |rest| (true, rest));
    let hex = strip_hex_prefix(magnitude);
    let radix = if hex.is_some() { 16 } else { 10 };
    let value = i64::from_str_radix(hex.unwrap_or(magnitude), radix).ok();
    value
        .map(|v| if negative { -v } else { v })
        .and_then(fit_word)
        .ok_or_else(|| ParseError::InvalidOperand {
            operand: text.to_string(),
        })
}

/// Keeps values that fit 32 bits as either signed or unsigned.
fn fit_word(value: i64) -> Option<i32> {
    i32::try_from(value)
        .ok()
        .or_else(|| u32::try_from(value).ok().map(|u| u as i32))
}

/// Parses the third ALU operand: a `$` register or an immediate.
fn parse_register_or_constant(text: &str) -> Result<i32, ParseError> {
    if text.starts_with('$') {
        parse_register(text).map(i32::from)
    } else {
        parse_constant(text)
    }
}

/// Decodes one trace line.
///
/// # Arguments
///
/// * `line` - 1-based line number, reported in errors.
/// * `text` - The line without its terminator.
///
/// # Errors
///
/// Returns [`TraceError::Parse`] for a missing address or mnemonic, a bad hex
/// address, or missing or unreadable operands, and
/// [`TraceError::UnsupportedInstruction`] for a mnemonic outside the table above.
pub fn decode_line(line: usize, text: &str) -> Result<Instruction, TraceError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    let parse_err = |source: ParseError| TraceError::Parse { line, source };

    let (address, mnemonic) = match fields.as_slice() {
        [addr, mnemonic, ..] => match parse_hex(addr) {
            Some(address) => (address, *mnemonic),
            None => {
                return Err(parse_err(ParseError::Malformed {
                    text: text.trim().to_string(),
                }));
            }
        },
        _ => {
            return Err(parse_err(ParseError::Malformed {
                text: text.trim().to_string(),
            }));
        }
    };
    let operands = &fields[2..];
    let malformed = || {
        parse_err(ParseError::MalformedOperands {
            mnemonic: mnemonic.to_string(),
            address,
        })
    };

    let family = |prefixes: &[&str]| prefixes.iter().any(|p| mnemonic.starts_with(p));

    let kind = if family(&["add", "sll", "ori"]) {
        let [rd, rs, rt, ..] = operands else {
            return Err(malformed());
        };
        InstructionKind::RType {
            mnemonic: mnemonic.to_string(),
            dest: Some(parse_register(rd).map_err(parse_err)?),
            src1: Some(parse_register(rs).map_err(parse_err)?),
            src2_or_constant: Some(parse_register_or_constant(rt).map_err(parse_err)?),
        }
    } else if mnemonic.starts_with("lui") {
        let [rd, _constant, ..] = operands else {
            return Err(malformed());
        };
        InstructionKind::RType {
            mnemonic: mnemonic.to_string(),
            dest: Some(parse_register(rd).map_err(parse_err)?),
            src1: None,
            src2_or_constant: None,
        }
    } else if mnemonic.starts_with("lw") || mnemonic.starts_with("sw") {
        let [reg, _offset_base, data, ..] = operands else {
            return Err(malformed());
        };
        let reg = parse_register(reg).map_err(parse_err)?;
        let data_address = parse_hex(data).ok_or_else(malformed)?;
        if mnemonic.starts_with("lw") {
            InstructionKind::Load {
                dest: Some(reg),
                base: None,
                data_address,
            }
        } else {
            InstructionKind::Store {
                src: Some(reg),
                base: None,
                data_address,
            }
        }
    } else if mnemonic.starts_with("beq") {
        InstructionKind::Branch { rs: None, rt: None }
    } else if mnemonic.starts_with('j') {
        InstructionKind::Jump {
            mnemonic: mnemonic.to_string(),
        }
    } else if mnemonic.starts_with("syscall") {
        InstructionKind::Syscall
    } else if mnemonic.starts_with("nop") {
        InstructionKind::Nop
    } else {
        return Err(TraceError::UnsupportedInstruction {
            line,
            mnemonic: mnemonic.to_string(),
            address,
        });
    };

    Ok(Instruction::new(address, kind))
}
