//! Global Model Constants.
//!
//! This module defines the fixed parameters of the timing model. It includes:
//! 1. **Address Constants:** Word size and address width used for bit decomposition.
//! 2. **Cache Constants:** The capacity ceiling checked at configuration time.
//! 3. **Timing Constants:** Miss and misprediction penalties in cycles.

/// Width of a trace address in bits.
pub const ADDRESS_BITS: u32 = 32;

/// Size of one machine word in bytes.
pub const WORD_BYTES: u32 = 4;

/// Size of one instruction in bytes; the fall-through successor is `pc + 4`.
pub const INSTRUCTION_SIZE: u32 = 4;

/// Upper bound on modeled cache capacity in bits (tag + valid + data for every line).
pub const MAX_CACHE_SIZE: u64 = 10240;

/// Cycles charged for a cache miss, on both the fetch and the data path.
pub const MISS_PENALTY: u64 = 10;

/// Extra cycles charged when the static branch prediction is wrong.
pub const BRANCH_MISPREDICT_PENALTY: u64 = 2;

/// Number of stages in the pipeline (Fetch, Decode, Execute, Memory, Writeback).
pub const PIPELINE_DEPTH: usize = 5;
