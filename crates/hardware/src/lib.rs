//! Trace-driven cache and pipeline timing model.
//!
//! This crate models the timing of a simple in-order processor:
//! 1. **Cache:** Set-associative, configurable geometry, true LRU replacement.
//! 2. **Pipeline:** Fixed five stages with stalls for cache misses and branch mispredictions.
//! 3. **ISA:** Decoding of MIPS-style trace lines into instruction records.
//! 4. **Simulation:** Driver, trace reader, configuration, and statistics.
//!
//! ```
//! use cachepipe_core::{Config, Simulator};
//! use cachepipe_core::isa::{Instruction, InstructionKind};
//!
//! let mut sim = Simulator::new(&Config::default()).unwrap();
//! sim.step(Instruction::new(0x0040_0000, InstructionKind::Syscall));
//! let stats = sim.finish();
//! assert_eq!(stats.instructions_retired, 1);
//! assert_eq!(stats.cache_hits + stats.cache_misses, stats.cache_accesses);
//! ```

/// Common types and constants (penalties, capacity ceiling, errors).
pub mod common;
/// Run configuration (cache geometry, branch policy, debug output).
pub mod config;
/// Modeled core (pipeline, cache, branch resolution).
pub mod core;
/// Trace instruction records and decoding.
pub mod isa;
/// Simulation driver and trace reader.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Top-level driver owning the cache, pipeline, and counters.
pub use crate::sim::Simulator;
/// Run counters.
pub use crate::stats::SimStats;
