//! Branch resolution unit (BRU).
//!
//! The pipeline resolves conditional branches in Decode by comparing the
//! address of the instruction behind the branch with the fall-through address,
//! and checks the outcome against a static prediction.

/// Static branch predictor (fixed taken / not-taken policy).
pub mod static_bp;

pub use self::static_bp::{BranchOutcome, StaticPredictor};
