//! Simulator: owns the cache, the pipeline, and the run statistics side-by-side.
//!
//! Each trace record goes through two steps:
//! 1. **Fetch:** the instruction address is looked up in the cache. A miss stalls
//!    the front end by advancing the pipeline `MISS_PENALTY - 1` times, so that
//!    the advance made by the following enqueue completes the penalty.
//! 2. **Enqueue:** the record enters Fetch.
//!
//! At the end of the trace the pipeline is drained and the counters are final.

use std::path::Path;

use tracing::{debug, info};

use crate::common::constants::MISS_PENALTY;
use crate::common::error::Result;
use crate::config::Config;
use crate::core::pipeline::Pipeline;
use crate::core::units::cache::{CacheAccess, CacheSim};
use crate::isa::instruction::Instruction;
use crate::sim::trace::TraceReader;
use crate::stats::SimStats;

/// Top-level simulator: cache + pipeline + counters.
#[derive(Debug, Clone)]
pub struct Simulator {
    cache: CacheSim,
    pipeline: Pipeline,
    stats: SimStats,
}

impl Simulator {
    /// Creates a simulator with an empty pipeline and an all-invalid cache.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`](crate::common::error::SimError::Config) if
    /// the cache geometry is rejected; no simulation state is created.
    pub fn new(config: &Config) -> Result<Self> {
        let cache = CacheSim::new(&config.cache)?;
        info!(
            index_bits = config.cache.index_bits,
            sets = cache.num_sets(),
            block_size_words = config.cache.block_size_words,
            associativity = config.cache.associativity,
            offset_bits = config.cache.offset_bits(),
            capacity_bits = config.cache.capacity_bits(),
            branch_policy = ?config.pipeline.branch_policy,
            "cache configuration"
        );
        let pipeline =
            Pipeline::new(config.pipeline.branch_policy).with_dump(config.general.dump_pipeline);
        Ok(Self {
            cache,
            pipeline,
            stats: SimStats::default(),
        })
    }

    /// Read access to the cache.
    pub const fn cache(&self) -> &CacheSim {
        &self.cache
    }

    /// Read access to the pipeline.
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Processes one trace record: instruction fetch, fetch stall, enqueue.
    ///
    /// Returns the outcome of the instruction fetch lookup.
    pub fn step(&mut self, inst: Instruction) -> CacheAccess {
        let fetch = self.cache.access(inst.address);
        if fetch.is_hit() {
            debug!("INST HIT: address {:#x}", inst.address);
        } else {
            debug!("INST MISS: address {:#x}", inst.address);
            self.stats.icache_misses += 1;
            for _ in 0..MISS_PENALTY - 1 {
                let _ = self.pipeline.advance_cycle(&mut self.cache, &mut self.stats);
            }
        }
        let _ = self.pipeline.enqueue(inst, &mut self.cache, &mut self.stats);
        fetch
    }

    /// Drains the pipeline and returns the final counters.
    ///
    /// Calling it again without new records changes nothing.
    pub fn finish(&mut self) -> SimStats {
        let drained = self.pipeline.drain(&mut self.cache, &mut self.stats);
        debug!(drained, "pipeline drained");
        self.stats()
    }

    /// Runs every record of `trace`, then drains.
    ///
    /// # Errors
    ///
    /// Stops at the first record that failed to decode or read and returns
    /// that error; the records before it have already been simulated.
    pub fn run<I>(&mut self, trace: I) -> Result<SimStats>
    where
        I: IntoIterator<Item = Result<Instruction>>,
    {
        for inst in trace {
            let _ = self.step(inst?);
        }
        Ok(self.finish())
    }

    /// Opens a trace file and runs it to completion.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or the first trace error.
    pub fn run_trace_file(&mut self, path: impl AsRef<Path>) -> Result<SimStats> {
        let reader = TraceReader::open(path)?;
        self.run(reader)
    }

    /// Snapshot of the counters, cache counters included.
    pub fn stats(&self) -> SimStats {
        let mut stats = self.stats.clone();
        stats.record_cache(self.cache.counters());
        stats
    }

    /// Returns to the freshly constructed state: cache invalid, pipeline empty, counters zero.
    pub fn reset(&mut self) {
        self.cache.reset();
        self.pipeline.reset();
        self.stats = SimStats::default();
    }
}
