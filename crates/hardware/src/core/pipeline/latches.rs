//! Pipeline stage slots.
//!
//! This module defines what each of the five stages holds between cycles:
//! Fetch → Decode → Execute → Memory → Writeback.
//!
//! A slot is either empty (a bubble) or occupied by one trace instruction. A
//! slot "holds NOP" when it is empty or when its instruction is a `nop`.

use std::fmt;

use crate::common::constants::PIPELINE_DEPTH;
use crate::isa::instruction::{Instruction, InstructionKind};

/// One of the five pipeline stages, in flow order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Instruction fetch.
    Fetch = 0,
    /// Decode; conditional branches are resolved here.
    Decode = 1,
    /// ALU.
    Execute = 2,
    /// Data cache access for loads and stores.
    Memory = 3,
    /// Register writeback; instructions retire when they leave this stage.
    Writeback = 4,
}

impl Stage {
    /// All stages in flow order.
    pub const ALL: [Self; PIPELINE_DEPTH] = [
        Self::Fetch,
        Self::Decode,
        Self::Execute,
        Self::Memory,
        Self::Writeback,
    ];

    /// Position of the stage in the slot array.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Label used in stage dumps.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fetch => "FETCH",
            Self::Decode => "DECODE",
            Self::Execute => "ALU",
            Self::Memory => "MEM",
            Self::Writeback => "WB",
        }
    }
}

/// Contents of one stage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StageSlot {
    /// Bubble.
    #[default]
    Empty,
    /// An instruction from the trace.
    Occupied(Instruction),
}

impl StageSlot {
    /// Returns the instruction in the slot, if any.
    pub const fn instruction(&self) -> Option<&Instruction> {
        match self {
            Self::Empty => None,
            Self::Occupied(inst) => Some(inst),
        }
    }

    /// Returns the instruction kind, if occupied.
    pub fn kind(&self) -> Option<&InstructionKind> {
        self.instruction().map(|inst| &inst.kind)
    }

    /// Returns the instruction address, if occupied.
    pub fn address(&self) -> Option<u32> {
        self.instruction().map(|inst| inst.address)
    }

    /// True for a bubble or a `nop` instruction.
    pub fn is_nop(&self) -> bool {
        self.kind().is_none_or(InstructionKind::is_nop)
    }

    /// True if the slot holds a conditional branch.
    pub fn is_branch(&self) -> bool {
        matches!(self.kind(), Some(InstructionKind::Branch { .. }))
    }
}

impl fmt::Display for StageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "NOP: 0x0"),
            Self::Occupied(inst) => write!(f, "{inst}"),
        }
    }
}
