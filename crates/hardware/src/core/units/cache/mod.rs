//! Set-Associative Cache Model.
//!
//! This module implements the cache the pipeline fetches instructions and data
//! through. It tracks presence only (valid bit and tag per line), splits
//! addresses into tag, index, and block offset fields, and replaces lines with
//! true LRU. It counts accesses, hits, and misses.

/// Per-set LRU recency stacks.
pub mod lru;

use serde::Serialize;
use tracing::trace;

pub use self::lru::LruPolicy;
use crate::common::constants::ADDRESS_BITS;
use crate::common::error::ConfigError;
use crate::config::CacheConfig;

/// Trait for cache replacement policies.
///
/// Defines the interface for updating usage state and selecting victim lines.
pub trait ReplacementPolicy {
    /// Updates the policy state when a line is accessed or filled.
    ///
    /// # Arguments
    ///
    /// * `set` - The cache set index.
    /// * `way` - The way index within the set that was accessed.
    fn update(&mut self, set: usize, way: usize);

    /// Selects the way to overwrite when `set` has no invalid line.
    fn get_victim(&mut self, set: usize) -> usize;
}

/// Outcome of a cache lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheAccess {
    /// The block was present.
    Hit,
    /// The block was absent and has been installed.
    Miss,
}

impl CacheAccess {
    /// Returns `true` for [`CacheAccess::Hit`].
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }
}

/// Access counters. `hits + misses == accesses` at all times.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheCounters {
    /// Total lookups.
    pub accesses: u64,
    /// Lookups that found the block.
    pub hits: u64,
    /// Lookups that installed the block.
    pub misses: u64,
}

/// Cache line entry: presence only.
#[derive(Clone, Copy, Debug, Default)]
struct CacheLine {
    tag: u32,
    valid: bool,
}

/// Set-associative cache with LRU replacement.
///
/// Lines are stored in one flat vector, `ways` consecutive lines per set.
#[derive(Debug, Clone)]
pub struct CacheSim {
    lines: Vec<CacheLine>,
    policy: LruPolicy,
    ways: usize,
    index_bits: u32,
    offset_bits: u32,
    counters: CacheCounters,
}

impl CacheSim {
    /// Creates a cache with every line invalid.
    ///
    /// # Arguments
    ///
    /// * `config` - Index width, block size in words, and associativity.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the geometry is rejected by
    /// [`CacheConfig::validate`], most notably when the modeled capacity
    /// exceeds [`MAX_CACHE_SIZE`](crate::common::constants::MAX_CACHE_SIZE).
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let ways = config.associativity as usize;
        let num_sets = config.num_sets();

        Ok(Self {
            lines: vec![CacheLine::default(); num_sets * ways],
            policy: LruPolicy::new(num_sets, ways),
            ways,
            index_bits: config.index_bits,
            offset_bits: config.offset_bits(),
            counters: CacheCounters::default(),
        })
    }

    /// Splits an address into `(set index, tag)`.
    ///
    /// `index = (addr >> offset_bits) & ((1 << index_bits) - 1)` and
    /// `tag = addr >> (offset_bits + index_bits)`; a tag field of width zero reads as 0.
    pub const fn decompose(&self, addr: u32) -> (usize, u32) {
        let mask = (1u64 << self.index_bits) - 1;
        let index = (((addr as u64) >> self.offset_bits) & mask) as usize;
        let tag_shift = self.offset_bits + self.index_bits;
        let tag = if tag_shift >= ADDRESS_BITS {
            0
        } else {
            addr >> tag_shift
        };
        (index, tag)
    }

    fn find(&self, set: usize, tag: u32) -> Option<usize> {
        let base = set * self.ways;
        let lines = &self.lines[base..base + self.ways];
        lines.iter().position(|line| line.valid && line.tag == tag)
    }

    /// Checks if the block holding `addr` is present, without touching recency or counters.
    pub fn contains(&self, addr: u32) -> bool {
        let (set, tag) = self.decompose(addr);
        self.find(set, tag).is_some()
    }

    /// Looks up `addr`, updating recency and counters.
    ///
    /// On a hit the matching way becomes MRU. On a miss the first invalid way
    /// of the set is filled, or the LRU way is overwritten when the set is
    /// full; validity and tag are written together and the filled way becomes MRU.
    pub fn access(&mut self, addr: u32) -> CacheAccess {
        self.counters.accesses += 1;
        let (set, tag) = self.decompose(addr);

        if let Some(way) = self.find(set, tag) {
            self.counters.hits += 1;
            self.policy.update(set, way);
            trace!(addr, set, way, "cache hit");
            return CacheAccess::Hit;
        }

        self.counters.misses += 1;
        let base = set * self.ways;
        let way = self.lines[base..base + self.ways]
            .iter()
            .position(|line| !line.valid)
            .unwrap_or_else(|| self.policy.get_victim(set));

        let victim = &mut self.lines[base + way];
        if victim.valid {
            trace!(addr, set, way, evicted_tag = victim.tag, "cache evict");
        }
        *victim = CacheLine { tag, valid: true };
        self.policy.update(set, way);
        CacheAccess::Miss
    }

    /// Returns the tags of `set` ordered from MRU to LRU; `None` marks an invalid line.
    ///
    /// # Panics
    ///
    /// Panics if `set` is not below the number of sets.
    pub fn recency(&self, set: usize) -> Vec<Option<u32>> {
        let base = set * self.ways;
        self.policy
            .order(set)
            .iter()
            .map(|&way| {
                let line = self.lines[base + way];
                line.valid.then_some(line.tag)
            })
            .collect()
    }

    /// Returns the access counters.
    pub const fn counters(&self) -> CacheCounters {
        self.counters
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        1usize << self.index_bits
    }

    /// Lines per set.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Invalidates every line, restores the initial recency order, and zeroes the counters.
    pub fn reset(&mut self) {
        self.lines.fill(CacheLine::default());
        self.policy.reset();
        self.counters = CacheCounters::default();
    }
}
