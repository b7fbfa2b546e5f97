//! Simulator Driver Tests.
//!
//! Exercises the per-record sequence (fetch lookup, fetch stall, enqueue),
//! end-to-end runs over in-memory traces, and reset.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use cachepipe_core::common::error::{SimError, TraceError};
use cachepipe_core::config::{BranchPolicy, CacheConfig, Config};
use cachepipe_core::core::pipeline::Stage;
use cachepipe_core::core::units::cache::CacheAccess;
use cachepipe_core::sim::TraceReader;
use cachepipe_core::{SimStats, Simulator};

use crate::common::{alu, branch, load};

fn simulator() -> Simulator {
    Simulator::new(&Config::default()).unwrap()
}

fn run_text(sim: &mut Simulator, text: &str) -> Result<SimStats, SimError> {
    sim.run(TraceReader::new(text.as_bytes()))
}

// ══════════════════════════════════════════════════════════
// 1. Instruction Fetch
// ══════════════════════════════════════════════════════════

/// A fetch miss costs the full miss penalty before the record enters Fetch.
#[test]
fn fetch_miss_stalls_for_miss_penalty() {
    let mut sim = simulator();
    assert_eq!(sim.step(alu(0x0040_0000)), CacheAccess::Miss);

    let stats = sim.stats();
    assert_eq!(stats.cycles, 10);
    assert_eq!(stats.icache_misses, 1);
    assert_eq!(stats.cache_misses, 1);
    assert!(sim.pipeline().stage(Stage::Fetch).instruction().is_some());
}

#[test]
fn fetch_hit_costs_one_cycle() {
    let mut sim = simulator();
    let _ = sim.step(alu(0x0040_0000));
    assert_eq!(sim.step(alu(0x0040_0000)), CacheAccess::Hit);
    assert_eq!(sim.stats().cycles, 11);
    assert_eq!(sim.stats().icache_misses, 1);
}

#[test]
fn single_instruction_run() {
    let mut sim = simulator();
    let _ = sim.step(alu(0x0040_0000));
    let stats = sim.finish();

    assert_eq!(stats.instructions_retired, 1);
    assert_eq!(stats.cycles, 15);
    assert_eq!(stats.cache_accesses, 1);
}

/// Instruction and data lookups share one cache.
#[test]
fn load_counts_fetch_and_data_accesses() {
    let mut sim = simulator();
    let _ = sim.step(load(0x0, 0x1000_0000));
    let stats = sim.finish();

    assert_eq!(stats.cache_accesses, 2);
    assert_eq!(stats.cache_misses, 2);
    assert_eq!(stats.icache_misses, 1);
    assert_eq!(stats.dcache_misses, 1);
    assert_eq!(stats.stalls_mem, 10);
    assert_eq!(stats.cycles, 24);
    assert_eq!(stats.instructions_retired, 1);
}

// ══════════════════════════════════════════════════════════
// 2. Trace Runs
// ══════════════════════════════════════════════════════════

/// Four `beq`s. The first is followed by a fetch miss and stays unresolved;
/// of the rest, one falls through and two jump back to 0x400000.
const LOOP_TRACE: &str = "\
400000 addiu $8, $0, 0
400004 beq $8, $9, 8
400008 j 400000
400000 addiu $8, $0, 0
400004 beq $8, $9, 8
400008 j 400000
400000 addiu $8, $8, 1
400004 beq $8, $9, 8
400000 addiu $8, $8, 1
400004 beq $8, $9, 8
400000 addiu $8, $8, 1

40000c lw $2, 0($sp) 10010040
400010 sw $2, 4($sp) 10010044
400014 syscall
";

#[test]
fn run_counts_branches_and_retirements() {
    let mut sim = simulator();
    let stats = run_text(&mut sim, LOOP_TRACE).unwrap();

    assert_eq!(stats.instructions_retired, 14);
    assert_eq!(stats.cache_accesses, 16);
    assert_eq!(stats.dcache_misses, 2);
    assert_eq!(stats.branch_count, 4);
    assert_eq!(stats.correct_branch_predictions, 1);
    assert_eq!(stats.branch_mispredictions, 2);
    assert_eq!(stats.stalls_control, 4);
    assert_eq!(stats.cache_hits + stats.cache_misses, stats.cache_accesses);
    assert!(stats.cycles >= stats.instructions_retired);
}

#[test]
fn predict_taken_flips_the_outcomes() {
    let mut config = Config::default();
    config.pipeline.branch_policy = BranchPolicy::Taken;
    let mut sim = Simulator::new(&config).unwrap();
    let stats = run_text(&mut sim, LOOP_TRACE).unwrap();

    assert_eq!(stats.branch_count, 4);
    assert_eq!(stats.correct_branch_predictions, 2);
    assert_eq!(stats.branch_mispredictions, 1);
}

#[test]
fn first_bad_line_aborts_with_its_number() {
    let mut sim = simulator();
    let text = "400000 addu $1, $2, $3\n\n400008 mult $1, $2\n400010 nop\n";
    let err = run_text(&mut sim, text).unwrap_err();

    match err {
        SimError::Trace(trace) => {
            assert_eq!(trace.line(), 3);
            assert!(matches!(trace, TraceError::UnsupportedInstruction { .. }));
        }
        other => panic!("expected a trace error, got {other:?}"),
    }
    // The record before the bad line was simulated.
    assert_eq!(sim.stats().cache_accesses, 1);
}

#[test]
fn oversized_cache_fails_before_running() {
    let mut config = Config::default();
    config.cache = CacheConfig::new(10, 1, 1);
    assert!(matches!(Simulator::new(&config), Err(SimError::Config(_))));
}

/// The stage dump is observation only.
#[test]
fn pipeline_dump_does_not_change_counters() {
    let mut config = Config::default();
    let quiet = run_text(&mut Simulator::new(&config).unwrap(), LOOP_TRACE).unwrap();
    config.general.dump_pipeline = true;
    let dumped = run_text(&mut Simulator::new(&config).unwrap(), LOOP_TRACE).unwrap();
    assert_eq!(quiet, dumped);
}

// ══════════════════════════════════════════════════════════
// 3. Finish and Reset
// ══════════════════════════════════════════════════════════

#[test]
fn finish_twice_is_idempotent() {
    let mut sim = simulator();
    for inst in [alu(0x0), branch(0x4), alu(0x40), load(0x44, 0x2000)] {
        let _ = sim.step(inst);
    }
    let first = sim.finish();
    let second = sim.finish();
    assert_eq!(first, second);
}

#[test]
fn reset_restores_fresh_state() {
    let mut sim = simulator();
    let fresh = run_text(&mut sim, LOOP_TRACE).unwrap();

    sim.reset();
    assert_eq!(sim.stats(), SimStats::default());
    assert!(sim.pipeline().is_drained());
    assert!(!sim.cache().contains(0x0040_0000));

    let again = run_text(&mut sim, LOOP_TRACE).unwrap();
    assert_eq!(again, fresh);
}

// ══════════════════════════════════════════════════════════
// 4. Properties
// ══════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cycles_never_fall_below_retirements(
        pcs in prop::collection::vec(0u32..0x200, 1..80),
        index_bits in 0u32..=5,
        assoc in 1u32..=2,
    ) {
        let mut config = Config::default();
        config.cache = CacheConfig::new(index_bits, 1, assoc);
        let mut sim = Simulator::new(&config).unwrap();

        for (i, pc) in pcs.iter().enumerate() {
            let pc = pc * 4;
            let inst = match i % 3 {
                0 => alu(pc),
                1 => load(pc, 0x1000_0000 + pc),
                _ => branch(pc),
            };
            let _ = sim.step(inst);
        }
        let stats = sim.finish();

        prop_assert_eq!(stats.instructions_retired, pcs.len() as u64);
        prop_assert!(stats.cycles >= stats.instructions_retired);
        prop_assert_eq!(stats.cache_hits + stats.cache_misses, stats.cache_accesses);
        prop_assert_eq!(stats.cache_misses, stats.icache_misses + stats.dcache_misses);
    }
}
