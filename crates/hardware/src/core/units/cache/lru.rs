//! Least Recently Used (LRU) recency tracking.
//!
//! Each set keeps a usage stack of way indices. When a way is accessed, it is
//! moved to the top (Most Recently Used position) and every way above its old
//! position slides down by one, so the relative order of the others is kept.
//! The bottom of the stack is the Least Recently Used way.
//!
//! All stacks live in one flat vector; set `s` owns the slice
//! `s * ways .. (s + 1) * ways`.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(W) where W is the number of ways (associativity)
//!   - `get_victim()`: O(1)
//! - **Space Complexity:** O(S × W) where S is the number of sets

use super::ReplacementPolicy;

/// LRU state for every set of a cache.
#[derive(Debug, Clone)]
pub struct LruPolicy {
    /// Concatenated usage stacks. Within a set, index 0 is MRU, the last index is LRU.
    usage: Vec<usize>,
    ways: usize,
}

impl LruPolicy {
    /// Creates a new LRU policy instance.
    ///
    /// Every set starts with the stack `[0, 1, .., ways - 1]`.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        let usage = (0..sets).flat_map(|_| 0..ways).collect();
        Self { usage, ways }
    }

    fn stack(&self, set: usize) -> &[usize] {
        &self.usage[set * self.ways..(set + 1) * self.ways]
    }

    fn stack_mut(&mut self, set: usize) -> &mut [usize] {
        &mut self.usage[set * self.ways..(set + 1) * self.ways]
    }

    /// Returns the ways of `set` ordered from MRU to LRU.
    pub fn order(&self, set: usize) -> &[usize] {
        self.stack(set)
    }

    /// Restores every set to its initial order.
    pub fn reset(&mut self) {
        for (i, slot) in self.usage.iter_mut().enumerate() {
            *slot = i % self.ways;
        }
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Promotes `way` to the MRU position of `set`.
    ///
    /// The ways that were more recent than `way` shift down one position;
    /// the ways that were less recent stay where they are.
    fn update(&mut self, set: usize, way: usize) {
        let stack = self.stack_mut(set);
        if let Some(pos) = stack.iter().position(|&x| x == way) {
            stack[..=pos].rotate_right(1);
        }
    }

    /// Returns the way at the bottom of the usage stack (LRU position).
    fn get_victim(&mut self, set: usize) -> usize {
        self.stack(set).last().copied().unwrap_or(0)
    }
}
