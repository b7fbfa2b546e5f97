//! Simulation statistics collection and reporting.
//!
//! This module tracks the counters of one run. It provides:
//! 1. **Cache:** Accesses, hits, misses, and the instruction/data split of misses.
//! 2. **Pipeline:** Total cycles, retired instructions, and CPI.
//! 3. **Branch prediction:** Branches resolved, correct predictions, mispredictions.
//! 4. **Stalls:** Cycles added by data misses and by mispredictions.
//!
//! Every counter is monotonically non-decreasing during a run.

use std::fmt;

use serde::Serialize;

use crate::core::units::cache::CacheCounters;

/// Simulation statistics structure tracking all performance metrics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    /// Total cache lookups (instruction fetches and data accesses).
    pub cache_accesses: u64,
    /// Cache lookups that hit.
    pub cache_hits: u64,
    /// Cache lookups that missed.
    pub cache_misses: u64,
    /// Misses on the instruction fetch path.
    pub icache_misses: u64,
    /// Misses on the Memory-stage data path.
    pub dcache_misses: u64,

    /// Total pipeline cycles elapsed.
    pub cycles: u64,
    /// Number of non-NOP instructions that left Writeback.
    pub instructions_retired: u64,

    /// Branches that reached Decode.
    pub branch_count: u64,
    /// Branches whose static prediction matched the actual direction.
    pub correct_branch_predictions: u64,
    /// Branches whose static prediction was wrong.
    pub branch_mispredictions: u64,

    /// Stall cycles charged for data misses in the Memory stage.
    pub stalls_mem: u64,
    /// Stall cycles charged for branch mispredictions.
    pub stalls_control: u64,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"cache"`, `"pipeline"`, `"branch"`, `"stalls"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["cache", "pipeline", "branch", "stalls"];

impl SimStats {
    /// Copies the cache counters into the cache fields.
    pub const fn record_cache(&mut self, counters: CacheCounters) {
        self.cache_accesses = counters.accesses;
        self.cache_hits = counters.hits;
        self.cache_misses = counters.misses;
    }

    /// Fraction of cache accesses that missed; 0.0 when there were no accesses.
    pub const fn miss_rate(&self) -> f64 {
        if self.cache_accesses == 0 {
            0.0
        } else {
            self.cache_misses as f64 / self.cache_accesses as f64
        }
    }

    /// Cycles per retired instruction; 0.0 when nothing retired.
    pub const fn cpi(&self) -> f64 {
        if self.instructions_retired == 0 {
            0.0
        } else {
            self.cycles as f64 / self.instructions_retired as f64
        }
    }

    /// Fraction of resolved branches predicted correctly; 0.0 with no resolved branches.
    pub const fn branch_accuracy(&self) -> f64 {
        let resolved = self.correct_branch_predictions + self.branch_mispredictions;
        if resolved == 0 {
            0.0
        } else {
            self.correct_branch_predictions as f64 / resolved as f64
        }
    }

    /// Renders the requested sections as text.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. An empty
    /// slice renders every section.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let mut out = String::new();

        if want("cache") {
            out.push_str("Cache Performance\n");
            push_row(&mut out, "cache.accesses", &self.cache_accesses);
            push_row(&mut out, "cache.misses", &self.cache_misses);
            push_row(&mut out, "cache.hits", &self.cache_hits);
            let miss_rate = format!("{:.6}", self.miss_rate());
            push_row(&mut out, "cache.miss_rate", &miss_rate);
            push_row(&mut out, "cache.inst_misses", &self.icache_misses);
            push_row(&mut out, "cache.data_misses", &self.dcache_misses);
        }
        if want("pipeline") {
            out.push_str("Pipeline Performance\n");
            push_row(&mut out, "cycles", &self.cycles);
            push_row(&mut out, "instructions", &self.instructions_retired);
            push_row(&mut out, "cpi", &format!("{:.6}", self.cpi()));
        }
        if want("branch") {
            out.push_str("Branch Prediction\n");
            push_row(&mut out, "branches", &self.branch_count);
            let correct = self.correct_branch_predictions;
            push_row(&mut out, "correct_predictions", &correct);
            push_row(&mut out, "mispredictions", &self.branch_mispredictions);
            let accuracy = format!("{:.2}%", self.branch_accuracy() * 100.0);
            push_row(&mut out, "accuracy", &accuracy);
        }
        if want("stalls") {
            let cyc = self.cycles.max(1) as f64;
            let share = |n: u64| format!("{n} ({:.2}%)", n as f64 / cyc * 100.0);
            out.push_str("Stall Breakdown\n");
            push_row(&mut out, "stalls.memory", &share(self.stalls_mem));
            push_row(&mut out, "stalls.control", &share(self.stalls_control));
        }
        out
    }

    /// Prints only the requested statistics sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }

    /// Prints all statistics sections to stdout.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}

/// Appends one indented row with the key padded to the value column.
fn push_row(out: &mut String, key: &str, value: &dyn fmt::Display) {
    out.push_str(&format!("  {key:<23}{value}\n"));
}
