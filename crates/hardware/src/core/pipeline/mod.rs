//! Instruction pipeline implementation.
//!
//! This module contains the fixed five-stage in-order pipeline:
//! 1. **Latches:** Stage identifiers and the slot each stage holds.
//! 2. **Engine:** Per-cycle advance, instruction entry, and draining.

/// Five-stage shift register with stall and bubble accounting.
pub mod engine;

/// Stage identifiers and stage slots.
pub mod latches;

pub use self::engine::{CycleEvents, Pipeline};
pub use self::latches::{Stage, StageSlot};
