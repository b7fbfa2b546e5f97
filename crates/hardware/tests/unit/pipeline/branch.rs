//! Branch Resolution Tests.
//!
//! A branch in Decode is resolved against the address in Fetch: the branch
//! was taken unless Fetch holds the fall-through address. The outcome is
//! checked against the static policy; a misprediction stalls for two cycles.

use pretty_assertions::assert_eq;

use cachepipe_core::config::BranchPolicy;
use cachepipe_core::core::pipeline::CycleEvents;
use cachepipe_core::core::units::bru::BranchOutcome;

use crate::common::{TestContext, alu, branch, load, nop};

/// Enqueues a branch at 0x100 followed by `next`, then advances once so the
/// branch is checked in Decode.
fn resolve(policy: BranchPolicy, next: u32) -> (TestContext, CycleEvents) {
    let mut ctx = TestContext::new(policy);
    ctx.enqueue_all([branch(0x100), alu(next)]);
    let events = ctx.advance();
    (ctx, events)
}

// ══════════════════════════════════════════════════════════
// 1. Predict Not Taken
// ══════════════════════════════════════════════════════════

#[test]
fn not_taken_policy_mispredicts_taken_branch() {
    let (ctx, events) = resolve(BranchPolicy::NotTaken, 0x200);

    assert_eq!(events.branch, Some(BranchOutcome::Mispredicted));
    assert!(events.bubble);
    assert_eq!(events.cycles, 2);
    assert_eq!(ctx.stats.branch_count, 1);
    assert_eq!(ctx.stats.correct_branch_predictions, 0);
    assert_eq!(ctx.stats.branch_mispredictions, 1);
    assert_eq!(ctx.stats.stalls_control, 2);
}

#[test]
fn not_taken_policy_predicts_fall_through() {
    let (ctx, events) = resolve(BranchPolicy::NotTaken, 0x104);

    assert_eq!(events.branch, Some(BranchOutcome::Correct));
    assert!(!events.bubble);
    assert_eq!(events.cycles, 1);
    assert_eq!(ctx.stats.correct_branch_predictions, 1);
    assert_eq!(ctx.stats.stalls_control, 0);
}

// ══════════════════════════════════════════════════════════
// 2. Predict Taken
// ══════════════════════════════════════════════════════════

#[test]
fn taken_policy_predicts_taken_branch() {
    let (ctx, events) = resolve(BranchPolicy::Taken, 0x200);

    assert_eq!(events.branch, Some(BranchOutcome::Correct));
    assert_eq!(ctx.stats.correct_branch_predictions, 1);
    assert_eq!(ctx.stats.branch_mispredictions, 0);
}

#[test]
fn taken_policy_mispredicts_fall_through() {
    let (ctx, events) = resolve(BranchPolicy::Taken, 0x104);

    assert_eq!(events.branch, Some(BranchOutcome::Mispredicted));
    assert_eq!(ctx.stats.stalls_control, 2);
}

// ══════════════════════════════════════════════════════════
// 3. Nothing Fetched Behind the Branch
// ══════════════════════════════════════════════════════════

/// The branch is counted, but there is no next address to resolve it against.
#[test]
fn empty_fetch_is_not_resolved() {
    let mut ctx = TestContext::default();
    let _ = ctx.enqueue(branch(0x100));
    let _ = ctx.advance();
    let events = ctx.advance();

    assert_eq!(events.branch, None);
    assert_eq!(events.cycles, 1);
    assert_eq!(ctx.stats.branch_count, 1);
    assert_eq!(ctx.stats.correct_branch_predictions, 0);
    assert_eq!(ctx.stats.branch_mispredictions, 0);
}

#[test]
fn nop_fetch_is_not_resolved() {
    let mut ctx = TestContext::default();
    ctx.enqueue_all([branch(0x100), nop(0x200)]);
    let events = ctx.advance();

    assert_eq!(events.branch, None);
    assert_eq!(ctx.stats.branch_count, 1);
    assert_eq!(ctx.stats.stalls_control, 0);
}

// ══════════════════════════════════════════════════════════
// 4. Combined Stalls
// ══════════════════════════════════════════════════════════

/// A mispredict and a data miss in the same advance both charge their
/// penalty; the baseline cycle is skipped once.
#[test]
fn branch_and_data_penalties_accumulate() {
    let mut ctx = TestContext::default();
    ctx.enqueue_all([load(0x0, 0x1000_0000), alu(0x4), branch(0x8), alu(0x40)]);
    let before = ctx.stats.cycles;
    let events = ctx.advance();

    assert_eq!(events.branch, Some(BranchOutcome::Mispredicted));
    assert!(events.data_access.is_some());
    assert_eq!(events.cycles, 12);
    assert_eq!(ctx.stats.cycles - before, 12);
    assert_eq!(ctx.stats.stalls_control, 2);
    assert_eq!(ctx.stats.stalls_mem, 10);
}
