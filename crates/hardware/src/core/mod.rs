//! Modeled processor core.
//!
//! This module contains the instruction pipeline and the functional units it
//! drives (cache and branch resolution).

/// Five-stage in-order instruction pipeline.
pub mod pipeline;

/// Functional units (cache, branch resolution).
pub mod units;

pub use self::pipeline::Pipeline;
pub use self::units::cache::CacheSim;
