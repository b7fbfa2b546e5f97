//! Configuration system for the timing model.
//!
//! This module defines the configuration structures used to parameterize a run.
//! It provides:
//! 1. **Defaults:** Baseline geometry (128 direct-mapped one-word lines) and policy.
//! 2. **Structures:** General, cache, and pipeline sections.
//! 3. **Enums:** Static branch-prediction policy.
//! 4. **Derived values:** Block offset width, tag width, and modeled capacity.
//!
//! Configuration is deserialized from JSON by the CLI (`--config`) or built with
//! `Config::default()` and overridden field by field.

use serde::{Deserialize, Serialize};

use crate::common::constants::{ADDRESS_BITS, MAX_CACHE_SIZE, WORD_BYTES};
use crate::common::error::ConfigError;

/// Default configuration constants.
mod defaults {
    /// Default number of index bits (128 sets).
    pub const INDEX_BITS: u32 = 7;

    /// Default block size in 4-byte words.
    pub const BLOCK_SIZE_WORDS: u32 = 1;

    /// Default associativity (1 way = direct-mapped).
    pub const ASSOCIATIVITY: u32 = 1;
}

/// Static branch-prediction policy.
///
/// The policy is fixed for the whole run and compared against the actual
/// outcome of every branch that reaches Decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum BranchPolicy {
    /// Always predict the branch falls through.
    #[default]
    #[serde(alias = "not_taken", alias = "NOT_TAKEN")]
    NotTaken,
    /// Always predict the branch is taken.
    #[serde(alias = "taken", alias = "TAKEN")]
    Taken,
}

impl BranchPolicy {
    /// Builds a policy from the boolean "predict taken" switch.
    pub const fn from_predict_taken(taken: bool) -> Self {
        if taken { Self::Taken } else { Self::NotTaken }
    }

    /// Returns the predicted direction: `true` for taken.
    pub const fn predicts_taken(self) -> bool {
        matches!(self, Self::Taken)
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use cachepipe_core::config::{BranchPolicy, Config};
///
/// let json = r#"{
///     "general": { "dump_pipeline": true },
///     "cache": { "index_bits": 5, "block_size_words": 4, "associativity": 2 },
///     "pipeline": { "branch_policy": "Taken" }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert!(config.general.dump_pipeline);
/// assert_eq!(config.cache.offset_bits(), 4);
/// assert_eq!(config.pipeline.branch_policy, BranchPolicy::Taken);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// General run settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Cache geometry.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Pipeline settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Parses a configuration from JSON text.
    ///
    /// Missing sections and fields take their defaults.
    pub fn from_json(text: &str) -> crate::common::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// General run settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Emit the contents of all five stages after every cycle (debug log level).
    #[serde(default)]
    pub dump_pipeline: bool,
}

/// Cache geometry.
///
/// Total lines = `associativity × 2^index_bits`, grouped into `2^index_bits` sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Address bits selecting the set.
    #[serde(default = "CacheConfig::default_index_bits")]
    pub index_bits: u32,

    /// Block size in 4-byte words.
    #[serde(default = "CacheConfig::default_block_size_words")]
    pub block_size_words: u32,

    /// Lines per set.
    #[serde(default = "CacheConfig::default_associativity")]
    pub associativity: u32,
}

impl CacheConfig {
    /// Returns the default index width.
    const fn default_index_bits() -> u32 {
        defaults::INDEX_BITS
    }

    /// Returns the default block size.
    const fn default_block_size_words() -> u32 {
        defaults::BLOCK_SIZE_WORDS
    }

    /// Returns the default associativity.
    const fn default_associativity() -> u32 {
        defaults::ASSOCIATIVITY
    }

    /// Creates a geometry from its three parameters.
    pub const fn new(index_bits: u32, block_size_words: u32, associativity: u32) -> Self {
        Self {
            index_bits,
            block_size_words,
            associativity,
        }
    }

    /// Block offset width: `ceil(log2(block_size_words × 4))`.
    ///
    /// A zero block size yields 0; it is rejected separately by validation.
    pub const fn offset_bits(&self) -> u32 {
        let bytes = self.block_size_words.saturating_mul(WORD_BYTES);
        if bytes <= 1 {
            0
        } else {
            u32::BITS - (bytes - 1).leading_zeros()
        }
    }

    /// Number of sets, `2^index_bits`.
    pub const fn num_sets(&self) -> usize {
        1usize << self.index_bits
    }

    /// Tag width in bits; the address bits left after index and offset.
    pub const fn tag_bits(&self) -> u32 {
        ADDRESS_BITS.saturating_sub(self.index_bits.saturating_add(self.offset_bits()))
    }

    /// Modeled capacity in bits: every line stores its data words, a valid bit, and a tag.
    ///
    /// Saturates at `u64::MAX` for geometries too large to count.
    pub const fn capacity_bits(&self) -> u64 {
        let line_bits = 32 * self.block_size_words as u64 + 1 + self.tag_bits() as u64;
        let sets = match 1u64.checked_shl(self.index_bits) {
            Some(sets) => sets,
            None => return u64::MAX,
        };
        let lines = (self.associativity as u64).saturating_mul(sets);
        lines.saturating_mul(line_bits)
    }

    /// Checks the geometry against the model's limits.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an empty set or block, for index and offset
    /// fields wider than an address, and for a capacity above [`MAX_CACHE_SIZE`].
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.associativity == 0 {
            return Err(ConfigError::ZeroAssociativity);
        }
        if self.block_size_words == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        let offset_bits = self.offset_bits();
        if self.index_bits.saturating_add(offset_bits) > ADDRESS_BITS {
            return Err(ConfigError::AddressBitsExceeded {
                index_bits: self.index_bits,
                offset_bits,
            });
        }
        let size = self.capacity_bits();
        if size > MAX_CACHE_SIZE {
            return Err(ConfigError::CacheTooLarge {
                size,
                max: MAX_CACHE_SIZE,
            });
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(
            defaults::INDEX_BITS,
            defaults::BLOCK_SIZE_WORDS,
            defaults::ASSOCIATIVITY,
        )
    }
}

/// Pipeline settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Static branch-prediction policy.
    #[serde(default)]
    pub branch_policy: BranchPolicy,
}
