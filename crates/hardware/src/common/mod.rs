//! Common utilities and types used throughout the timing model.
//!
//! This module provides the building blocks shared by the cache, the pipeline,
//! and the driver. It includes:
//! 1. **Constants:** Address width, capacity ceiling, and stall penalties.
//! 2. **Error Handling:** Configuration, trace, and top-level simulation errors.

/// Model-wide constants (address width, penalties, capacity ceiling).
pub mod constants;

/// Error types for configuration, trace decoding, and simulation.
pub mod error;

pub use constants::{MAX_CACHE_SIZE, MISS_PENALTY};
pub use error::{ConfigError, ParseError, Result, SimError, TraceError};
