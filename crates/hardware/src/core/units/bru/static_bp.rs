//! Static Branch Predictor.
//!
//! Predicts every conditional branch in the same direction, chosen once at
//! configuration time. There is no history and no target buffer; the actual
//! direction is inferred from the trace itself.

use crate::common::constants::INSTRUCTION_SIZE;
use crate::config::BranchPolicy;

/// Result of checking one resolved branch against the prediction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchOutcome {
    /// The predicted direction matched.
    Correct,
    /// The predicted direction was wrong; the pipeline must stall.
    Mispredicted,
}

/// Static Branch Predictor structure.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticPredictor {
    policy: BranchPolicy,
}

impl StaticPredictor {
    /// Creates a predictor with a fixed policy.
    pub const fn new(policy: BranchPolicy) -> Self {
        Self { policy }
    }

    /// Returns the configured policy.
    pub const fn policy(&self) -> BranchPolicy {
        self.policy
    }

    /// Predicts the direction of a branch: `true` for taken.
    pub const fn predict_branch(&self, _pc: u32) -> bool {
        self.policy.predicts_taken()
    }

    /// Infers whether the branch at `branch_pc` was taken from the address of
    /// the instruction fetched right behind it.
    pub const fn was_taken(branch_pc: u32, next_pc: u32) -> bool {
        branch_pc.wrapping_add(INSTRUCTION_SIZE) != next_pc
    }

    /// Resolves the branch at `branch_pc` given the address fetched after it.
    pub const fn resolve(&self, branch_pc: u32, next_pc: u32) -> BranchOutcome {
        if Self::was_taken(branch_pc, next_pc) == self.predict_branch(branch_pc) {
            BranchOutcome::Correct
        } else {
            BranchOutcome::Mispredicted
        }
    }
}
