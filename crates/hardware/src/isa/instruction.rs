//! Trace instruction records.
//!
//! A trace line decodes into an [`Instruction`]: the address it was fetched
//! from plus an [`InstructionKind`] carrying only the fields the timing model
//! needs. Register operands the trace does not provide are `None`.

use std::fmt;

/// Category of a trace instruction with its kind-specific fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstructionKind {
    /// No operation.
    Nop,
    /// Register/immediate ALU operation (`add*`, `sll*`, `ori*`, `lui`).
    RType {
        /// Mnemonic as written in the trace.
        mnemonic: String,
        /// Destination register.
        dest: Option<u8>,
        /// First source register.
        src1: Option<u8>,
        /// Second source register, or the immediate for shifts and `ori`.
        src2_or_constant: Option<i32>,
    },
    /// Load word; reads `data_address` in the Memory stage.
    Load {
        /// Destination register.
        dest: Option<u8>,
        /// Base register; traces carry the resolved address instead.
        base: Option<u8>,
        /// Effective data address.
        data_address: u32,
    },
    /// Store word; writes `data_address` in the Memory stage.
    Store {
        /// Source register.
        src: Option<u8>,
        /// Base register; traces carry the resolved address instead.
        base: Option<u8>,
        /// Effective data address.
        data_address: u32,
    },
    /// Conditional branch, resolved in Decode.
    Branch {
        /// First compared register.
        rs: Option<u8>,
        /// Second compared register.
        rt: Option<u8>,
    },
    /// Unconditional jump (`j`, `jal`, `jr`).
    Jump {
        /// Mnemonic as written in the trace.
        mnemonic: String,
    },
    /// System call.
    Syscall,
}

impl InstructionKind {
    /// Returns `true` for [`InstructionKind::Nop`].
    pub const fn is_nop(&self) -> bool {
        matches!(self, Self::Nop)
    }

    /// Returns the data address for loads and stores.
    pub const fn data_address(&self) -> Option<u32> {
        match self {
            Self::Load { data_address, .. } | Self::Store { data_address, .. } => {
                Some(*data_address)
            }
            _ => None,
        }
    }

    /// Short category name used in stage dumps and logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Nop => "NOP",
            Self::RType { .. } => "RTYPE",
            Self::Load { .. } => "LW",
            Self::Store { .. } => "SW",
            Self::Branch { .. } => "BRANCH",
            Self::Jump { .. } => "JUMP",
            Self::Syscall => "SYSCALL",
        }
    }
}

/// One decoded trace record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// Address the instruction was fetched from.
    pub address: u32,
    /// Instruction category and operands.
    pub kind: InstructionKind,
}

impl Instruction {
    /// Creates a record.
    pub const fn new(address: u32, kind: InstructionKind) -> Self {
        Self { address, kind }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:#x}", self.kind.name(), self.address)
    }
}
