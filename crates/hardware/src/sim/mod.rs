//! Simulation driver and trace input.
//!
//! Provides the [`Simulator`] that owns all run state, and the reader that
//! feeds it decoded trace records.

/// Driver: instruction fetch, pipeline entry, draining, and statistics.
pub mod simulator;

/// Line-oriented trace reader.
pub mod trace;

pub use self::simulator::Simulator;
pub use self::trace::TraceReader;
