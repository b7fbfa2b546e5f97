//! Trace Line Decoding Tests.
//!
//! Covers every supported mnemonic family, register and constant operand
//! spellings, and each way a line can be rejected.

use pretty_assertions::assert_eq;

use cachepipe_core::common::error::{ParseError, TraceError};
use cachepipe_core::isa::{Instruction, InstructionKind, decode_line};

fn decode(text: &str) -> Instruction {
    decode_line(1, text).unwrap()
}

fn rtype(mnemonic: &str, dest: u8, src1: Option<u8>, src2: Option<i32>) -> InstructionKind {
    InstructionKind::RType {
        mnemonic: mnemonic.to_string(),
        dest: Some(dest),
        src1,
        src2_or_constant: src2,
    }
}

fn parse_error(text: &str) -> ParseError {
    match decode_line(1, text) {
        Err(TraceError::Parse { source, .. }) => source,
        other => panic!("expected a parse error for {text:?}, got {other:?}"),
    }
}

// ══════════════════════════════════════════════════════════
// 1. ALU Family
// ══════════════════════════════════════════════════════════

#[test]
fn add_family_with_registers() {
    let inst = decode("400008 addu $8, $9, $10");
    assert_eq!(inst.address, 0x0040_0008);
    assert_eq!(inst.kind, rtype("addu", 8, Some(9), Some(10)));
}

#[test]
fn add_family_with_immediate() {
    let inst = decode("0x00400000 addiu $29, $29, -32");
    assert_eq!(inst.kind, rtype("addiu", 29, Some(29), Some(-32)));
}

#[test]
fn shift_and_ori_take_constants() {
    assert_eq!(decode("400004 sll $2, $3, 4").kind, rtype("sll", 2, Some(3), Some(4)));
    assert_eq!(
        decode("400004 ori $4, $4, 0xff").kind,
        rtype("ori", 4, Some(4), Some(0xff))
    );
}

#[test]
fn abi_register_names() {
    assert_eq!(
        decode("400010 addu $sp, $fp, $ra").kind,
        rtype("addu", 29, Some(30), Some(31))
    );
    assert_eq!(
        decode("400010 addu $t0, $zero, $s8").kind,
        rtype("addu", 8, Some(0), Some(30))
    );
}

#[test]
fn lui_has_no_sources() {
    assert_eq!(decode("40000c lui $1, 4097").kind, rtype("lui", 1, None, None));
}

// ══════════════════════════════════════════════════════════
// 2. Loads and Stores
// ══════════════════════════════════════════════════════════

#[test]
fn load_records_data_address() {
    let inst = decode("400010 lw $31, 28($29) 7fffeffc");
    assert_eq!(
        inst.kind,
        InstructionKind::Load {
            dest: Some(31),
            base: None,
            data_address: 0x7fff_effc,
        }
    );
    assert_eq!(inst.kind.data_address(), Some(0x7fff_effc));
}

#[test]
fn store_records_data_address() {
    let inst = decode("400014 sw $ra, 28($sp) 0x10010008");
    assert_eq!(
        inst.kind,
        InstructionKind::Store {
            src: Some(31),
            base: None,
            data_address: 0x1001_0008,
        }
    );
}

// ══════════════════════════════════════════════════════════
// 3. Control Flow and Others
// ══════════════════════════════════════════════════════════

#[test]
fn branch_ignores_operands() {
    assert_eq!(
        decode("400018 beq $2, $0, 40").kind,
        InstructionKind::Branch { rs: None, rt: None }
    );
}

#[test]
fn jump_family_keeps_mnemonic() {
    for mnemonic in ["j", "jal", "jr"] {
        let inst = decode(&format!("40001c {mnemonic} $31"));
        assert_eq!(
            inst.kind,
            InstructionKind::Jump {
                mnemonic: mnemonic.to_string()
            }
        );
    }
}

#[test]
fn syscall_and_nop() {
    assert_eq!(decode("400020 syscall").kind, InstructionKind::Syscall);
    let nop = decode("400024 nop");
    assert!(nop.kind.is_nop());
    assert_eq!(nop.to_string(), "NOP: 0x400024");
}

/// Fields past the ones the family needs are ignored, as is surrounding whitespace.
#[test]
fn extra_fields_and_whitespace_are_ignored() {
    let inst = decode("  400028\taddu $1, $2, $3   # comment\n");
    assert_eq!(inst.address, 0x0040_0028);
    assert_eq!(inst.kind, rtype("addu", 1, Some(2), Some(3)));
}

// ══════════════════════════════════════════════════════════
// 4. Rejected Lines
// ══════════════════════════════════════════════════════════

#[test]
fn missing_mnemonic_is_malformed() {
    assert_eq!(
        parse_error("400000"),
        ParseError::Malformed {
            text: "400000".to_string()
        }
    );
}

#[test]
fn bad_address_is_malformed() {
    assert!(matches!(
        parse_error("main: addu $1, $2, $3"),
        ParseError::Malformed { .. }
    ));
}

#[test]
fn missing_operands_are_reported() {
    assert_eq!(
        parse_error("400000 addu $1, $2"),
        ParseError::MalformedOperands {
            mnemonic: "addu".to_string(),
            address: 0x0040_0000,
        }
    );
    assert!(matches!(
        parse_error("400000 lw $1, 0($2)"),
        ParseError::MalformedOperands { .. }
    ));
    assert!(matches!(
        parse_error("400000 sw $1, 0($2) nothex"),
        ParseError::MalformedOperands { .. }
    ));
}

#[test]
fn out_of_range_register_is_invalid() {
    assert_eq!(
        parse_error("400000 addu $1, $32, $2"),
        ParseError::InvalidOperand {
            operand: "$32,".to_string()
        }
    );
}

#[test]
fn unknown_mnemonic_is_unsupported() {
    let err = decode_line(3, "400000 mult $1, $2").unwrap_err();
    assert_eq!(
        err,
        TraceError::UnsupportedInstruction {
            line: 3,
            mnemonic: "mult".to_string(),
            address: 0x0040_0000,
        }
    );
    assert_eq!(
        err.to_string(),
        "line 3: do not know how to process instruction mult at address 0x400000"
    );
}

#[test]
fn errors_carry_line_number() {
    let err = decode_line(42, "400000 addu $1").unwrap_err();
    assert_eq!(err.line(), 42);
}
