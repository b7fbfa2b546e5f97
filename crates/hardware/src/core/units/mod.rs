//! Functional units of the modeled core.
//!
//! This module contains the cache and the branch resolution unit. Both are
//! leaves: they hold their own state and are driven by the pipeline.

/// Branch Resolution Unit (static prediction and outcome checks).
pub mod bru;

/// Set-associative cache with LRU replacement.
pub mod cache;
