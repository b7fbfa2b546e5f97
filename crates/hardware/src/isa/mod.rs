//! Instruction Set Definitions.
//!
//! The model does not execute instructions; it only needs each trace record's
//! address, category, and (for loads and stores) its data address.
//!
//! * `instruction`: the decoded record and its per-kind fields.
//! * `decode`: text trace line → record.
//! * `abi`: MIPS register names.

/// MIPS ABI register name lookup.
pub mod abi;

/// Trace line decoder.
pub mod decode;

/// Decoded instruction records.
pub mod instruction;

pub use self::decode::decode_line;
pub use self::instruction::{Instruction, InstructionKind};
