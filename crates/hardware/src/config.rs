//! Configuration for the cache simulator.
//!
//! This module defines the cache organization being simulated. It provides:
//! 1. **Defaults:** Baseline `s`, `E` and `b` values used when a document omits a field.
//! 2. **Structure:** [`CacheConfig`], deserializable from JSON or built from CLI flags.
//! 3. **Validation:** Rejection of organizations that cannot be simulated, before any
//!    cache is allocated.

use std::mem;

use serde::{Deserialize, Serialize};

use crate::cache::{CacheLine, CacheSet};
use crate::common::addr::AddressLayout;
use crate::common::error::ConfigError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Default set-index bits (16 sets).
    pub const SET_BITS: u32 = 4;

    /// Default associativity (1 line per set = direct-mapped).
    pub const WAYS: usize = 1;

    /// Default block-offset bits (16-byte blocks).
    pub const BLOCK_BITS: u32 = 4;
}

/// Organization of the simulated cache.
///
/// `2^set_bits` sets of `ways` lines, each line holding a `2^block_bits`-byte
/// block. The organization is fixed for the whole replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Number of set-index bits (`s`); the cache has `2^s` sets.
    #[serde(default = "CacheConfig::default_set_bits")]
    pub set_bits: u32,

    /// Associativity (`E`), the number of lines per set.
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Number of block-offset bits (`b`); blocks are `2^b` bytes.
    #[serde(default = "CacheConfig::default_block_bits")]
    pub block_bits: u32,
}

impl CacheConfig {
    /// Returns the default set-index bit count.
    const fn default_set_bits() -> u32 {
        defaults::SET_BITS
    }

    /// Returns the default associativity.
    const fn default_ways() -> usize {
        defaults::WAYS
    }

    /// Returns the default block-offset bit count.
    const fn default_block_bits() -> u32 {
        defaults::BLOCK_BITS
    }

    /// Creates a configuration from the classic `-s`, `-E`, `-b` triple.
    ///
    /// The result is not validated; see [`CacheConfig::validate`].
    pub const fn new(set_bits: u32, ways: usize, block_bits: u32) -> Self {
        Self {
            set_bits,
            ways,
            block_bits,
        }
    }

    /// Deserializes and validates a JSON configuration document.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not valid JSON for
    /// this structure, or any error reported by [`CacheConfig::validate`].
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the organization can be simulated.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::ZeroAssociativity`] if `ways` is zero.
    /// * [`ConfigError::AddressBitsOverflow`] if `block_bits + set_bits > 64`.
    /// * [`ConfigError::CapacityOverflow`] if the line array cannot be allocated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ways == 0 {
            return Err(ConfigError::ZeroAssociativity);
        }
        let _ = self.layout()?;
        let _ = self.total_lines()?;
        Ok(())
    }

    /// The address layout implied by `set_bits` and `block_bits`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AddressBitsOverflow`] if the two fields do not
    /// fit in a 64-bit address.
    pub const fn layout(&self) -> Result<AddressLayout, ConfigError> {
        AddressLayout::new(self.block_bits, self.set_bits)
    }

    /// Number of sets, `2^set_bits`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CapacityOverflow`] if the count does not fit in `usize`.
    pub fn num_sets(&self) -> Result<usize, ConfigError> {
        1usize
            .checked_shl(self.set_bits)
            .ok_or(ConfigError::CapacityOverflow {
                set_bits: self.set_bits,
                ways: self.ways,
            })
    }

    /// Total number of lines, `2^set_bits * ways`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CapacityOverflow`] if the line array (plus the
    /// per-set headers) would exceed the largest allocation the host allows.
    pub fn total_lines(&self) -> Result<usize, ConfigError> {
        let overflow = ConfigError::CapacityOverflow {
            set_bits: self.set_bits,
            ways: self.ways,
        };
        let sets = self.num_sets()?;
        let lines = sets.checked_mul(self.ways).ok_or_else(|| overflow.clone())?;
        let bytes = lines
            .checked_mul(mem::size_of::<CacheLine>())
            .and_then(|b| b.checked_add(sets.checked_mul(mem::size_of::<CacheSet>())?))
            .ok_or_else(|| overflow.clone())?;
        if bytes > isize::MAX.unsigned_abs() {
            return Err(overflow);
        }
        Ok(lines)
    }

    /// Block size in bytes, `2^block_bits`, or `None` for a 64-bit offset field.
    pub const fn block_bytes(&self) -> Option<u64> {
        1u64.checked_shl(self.block_bits)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            set_bits: defaults::SET_BITS,
            ways: defaults::WAYS,
            block_bits: defaults::BLOCK_BITS,
        }
    }
}
