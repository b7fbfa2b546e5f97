//! Error definitions.
//!
//! Every error in the model is fatal: a run either completes or stops at the
//! first problem. This module provides:
//! 1. **Configuration Errors:** Cache geometries that cannot be modeled.
//! 2. **Trace Errors:** Malformed trace lines and unsupported mnemonics.
//! 3. **Simulation Errors:** The top-level error returned by the driver and CLI.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Rejected cache configuration.
///
/// Raised by [`CacheSim::new`](crate::core::units::cache::CacheSim::new) before
/// any line is allocated; the simulation must not proceed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Modeled capacity (tag + valid + data bits for every line) exceeds the ceiling.
    #[error("cache too big: {size} bits exceeds the maximum of {max} bits")]
    CacheTooLarge {
        /// Requested capacity in bits.
        size: u64,
        /// Fixed ceiling in bits.
        max: u64,
    },

    /// A set must hold at least one line.
    #[error("associativity must be at least 1")]
    ZeroAssociativity,

    /// A block must hold at least one word.
    #[error("block size must be at least 1 word")]
    ZeroBlockSize,

    /// Index and offset fields do not fit in a 32-bit address.
    #[error("{index_bits} index bits + {offset_bits} offset bits exceed a 32-bit address")]
    AddressBitsExceeded {
        /// Requested index width.
        index_bits: u32,
        /// Derived block offset width.
        offset_bits: u32,
    },
}

/// Malformed trace line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line does not start with `<hex address> <mnemonic>`.
    #[error("malformed instruction: {text:?}")]
    Malformed {
        /// Offending line, trimmed.
        text: String,
    },

    /// The mnemonic is known but its operands are missing or misplaced.
    #[error("malformed {mnemonic} instruction at address {address:#x}")]
    MalformedOperands {
        /// Instruction mnemonic.
        mnemonic: String,
        /// Instruction address.
        address: u32,
    },

    /// A register or constant operand could not be read.
    #[error("invalid operand {operand:?}")]
    InvalidOperand {
        /// Operand text as it appeared in the trace.
        operand: String,
    },
}

/// Failure to turn a trace line into an instruction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    /// The line could not be parsed.
    #[error("line {line}: {source}")]
    Parse {
        /// 1-based trace line number.
        line: usize,
        /// Underlying parse failure.
        source: ParseError,
    },

    /// The mnemonic is outside the modeled instruction set.
    #[error(
        "line {line}: do not know how to process instruction {mnemonic} at address {address:#x}"
    )]
    UnsupportedInstruction {
        /// 1-based trace line number.
        line: usize,
        /// Unrecognised mnemonic.
        mnemonic: String,
        /// Instruction address.
        address: u32,
    },
}

impl TraceError {
    /// Returns the 1-based trace line the error refers to.
    pub const fn line(&self) -> usize {
        match self {
            Self::Parse { line, .. } | Self::UnsupportedInstruction { line, .. } => *line,
        }
    }
}

/// Top-level simulation error.
#[derive(Error, Debug)]
pub enum SimError {
    /// Cache configuration rejected.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Trace line rejected.
    #[error("trace error: {0}")]
    Trace(#[from] TraceError),

    /// Trace or configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// I/O failure while streaming an already opened trace.
    #[error("I/O error: {0}")]
    Stream(#[from] std::io::Error),

    /// JSON configuration could not be parsed, or statistics could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
