//! Five-stage in-order pipeline.
//!
//! The pipeline is a shift register of five [`StageSlot`]s. Each call to
//! [`Pipeline::advance_cycle`] performs, in order:
//! 1. **Retire:** a non-NOP instruction in Writeback is counted.
//! 2. **Branch check:** a branch in Decode is resolved against the instruction in
//!    Fetch and compared with the static prediction; a misprediction charges
//!    the branch penalty.
//! 3. **Data access:** a load or store in Memory looks up the cache; a miss
//!    charges the miss penalty.
//! 4. **Cycle count:** one cycle is charged unless step 2 or 3 already charged a stall.
//! 5. **Shift:** every stage moves one step toward Writeback.
//! 6. **Refill:** Fetch becomes empty.
//!
//! Instructions enter only through [`Pipeline::enqueue`].

use std::fmt;

use tracing::debug;

use crate::common::constants::{BRANCH_MISPREDICT_PENALTY, MISS_PENALTY, PIPELINE_DEPTH};
use crate::config::BranchPolicy;
use crate::core::pipeline::latches::{Stage, StageSlot};
use crate::core::units::bru::{BranchOutcome, StaticPredictor};
use crate::core::units::cache::{CacheAccess, CacheSim};
use crate::isa::instruction::{Instruction, InstructionKind};
use crate::stats::SimStats;

/// What happened during one call to [`Pipeline::advance_cycle`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleEvents {
    /// Address of the non-NOP instruction that left Writeback.
    pub retired: Option<u32>,
    /// Outcome of the branch in Decode; `None` if there was none or nothing
    /// real was fetched behind it.
    pub branch: Option<BranchOutcome>,
    /// Data cache lookup performed by the Memory stage.
    pub data_access: Option<CacheAccess>,
    /// A misprediction bubble was inserted behind the branch.
    pub bubble: bool,
    /// Cycles charged by this call.
    pub cycles: u64,
}

/// The five-stage pipeline and its static branch predictor.
#[derive(Clone, Debug)]
pub struct Pipeline {
    slots: [StageSlot; PIPELINE_DEPTH],
    predictor: StaticPredictor,
    dump: bool,
}

impl Pipeline {
    /// Creates an empty pipeline with a fixed branch policy.
    pub fn new(policy: BranchPolicy) -> Self {
        Self {
            slots: Default::default(),
            predictor: StaticPredictor::new(policy),
            dump: false,
        }
    }

    /// Enables the per-cycle stage dump (emitted at debug level).
    #[must_use]
    pub const fn with_dump(mut self, dump: bool) -> Self {
        self.dump = dump;
        self
    }

    /// Returns the configured branch policy.
    pub const fn branch_policy(&self) -> BranchPolicy {
        self.predictor.policy()
    }

    /// Returns the slot of one stage.
    pub const fn stage(&self, stage: Stage) -> &StageSlot {
        &self.slots[stage.index()]
    }

    /// Returns all five slots in flow order.
    pub const fn slots(&self) -> &[StageSlot; PIPELINE_DEPTH] {
        &self.slots
    }

    /// True when every stage holds NOP.
    pub fn is_drained(&self) -> bool {
        self.slots.iter().all(StageSlot::is_nop)
    }

    /// Advances the pipeline by one logical cycle.
    ///
    /// The Memory stage's cache lookup and any stall it causes are applied
    /// before the stages shift.
    pub fn advance_cycle(&mut self, cache: &mut CacheSim, stats: &mut SimStats) -> CycleEvents {
        let mut events = CycleEvents::default();
        let mut stalled = false;

        if let StageSlot::Occupied(inst) = self.stage(Stage::Writeback)
            && !inst.kind.is_nop()
        {
            stats.instructions_retired += 1;
            events.retired = Some(inst.address);
        }

        let decode = self.stage(Stage::Decode);
        if decode.is_branch() {
            stats.branch_count += 1;
            let fetch = self.stage(Stage::Fetch);
            if let (Some(branch_pc), Some(next_pc)) = (decode.address(), fetch.address())
                && !fetch.is_nop()
            {
                let outcome = self.predictor.resolve(branch_pc, next_pc);
                match outcome {
                    BranchOutcome::Correct => stats.correct_branch_predictions += 1,
                    BranchOutcome::Mispredicted => {
                        stats.branch_mispredictions += 1;
                        stats.stalls_control += BRANCH_MISPREDICT_PENALTY;
                        stats.cycles += BRANCH_MISPREDICT_PENALTY;
                        events.cycles += BRANCH_MISPREDICT_PENALTY;
                        events.bubble = true;
                        stalled = true;
                        debug!(branch_pc, next_pc, "branch mispredicted");
                    }
                }
                events.branch = Some(outcome);
            }
        }

        if let Some(data_address) = self
            .stage(Stage::Memory)
            .kind()
            .and_then(InstructionKind::data_address)
        {
            let access = cache.access(data_address);
            if access.is_hit() {
                debug!("DATA HIT: address {data_address:#x}");
            } else {
                debug!("DATA MISS: address {data_address:#x}");
                stats.dcache_misses += 1;
                stats.stalls_mem += MISS_PENALTY;
                stats.cycles += MISS_PENALTY;
                events.cycles += MISS_PENALTY;
                stalled = true;
            }
            events.data_access = Some(access);
        }

        if !stalled {
            stats.cycles += 1;
            events.cycles += 1;
        }

        // Writeback's old contents rotate into Fetch and are discarded there.
        self.slots.rotate_right(1);
        self.slots[Stage::Fetch.index()] = StageSlot::Empty;

        if self.dump {
            debug!(cycle = stats.cycles, "{}", self);
        }
        events
    }

    /// Advances one cycle to make room, then places `inst` in Fetch.
    pub fn enqueue(
        &mut self,
        inst: Instruction,
        cache: &mut CacheSim,
        stats: &mut SimStats,
    ) -> CycleEvents {
        let events = self.advance_cycle(cache, stats);
        self.slots[Stage::Fetch.index()] = StageSlot::Occupied(inst);
        events
    }

    /// Advances until every stage holds NOP. Returns the number of cycles advanced.
    ///
    /// A drained pipeline is left untouched.
    pub fn drain(&mut self, cache: &mut CacheSim, stats: &mut SimStats) -> u64 {
        let mut advanced = 0;
        while !self.is_drained() {
            let _ = self.advance_cycle(cache, stats);
            advanced += 1;
        }
        advanced
    }

    /// Empties every stage.
    pub fn reset(&mut self) {
        self.slots = Default::default();
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in Stage::ALL.iter().enumerate() {
            if i > 0 {
                write!(f, "\t")?;
            }
            write!(f, "{}: {}", stage.label(), self.stage(*stage))?;
        }
        Ok(())
    }
}
