//! Set-Associative Cache Model.
//!
//! This module implements the simulated cache and its LRU replacement engine.
//! A [`Cache`] owns `2^s` [`CacheSet`]s, each owning `E` [`CacheLine`]s; the
//! arrays are sized once at construction and never resized. Every access
//! either hits, fills a free line, or evicts the least recently used line, and
//! bumps the matching counters in a caller-owned [`CacheStats`].

/// Least-recently-used victim selection.
pub mod lru;

/// Cache lines and sets.
pub mod set;

use std::fmt;
use std::io::{self, Write};

use tracing::info;

pub use self::set::{CacheLine, CacheSet};
use crate::common::error::ConfigError;
use crate::config::CacheConfig;
use crate::stats::CacheStats;

/// Classification of a single cache access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessOutcome {
    /// The block was resident.
    Hit,
    /// The block was absent and went into a free line.
    MissFill,
    /// The block was absent and replaced the least recently used line.
    MissEvict,
}

impl AccessOutcome {
    /// Whether the access hit.
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }

    /// Whether the access missed (with or without eviction).
    pub const fn is_miss(self) -> bool {
        !self.is_hit()
    }

    /// Whether the access evicted a resident block.
    pub const fn is_eviction(self) -> bool {
        matches!(self, Self::MissEvict)
    }
}

impl fmt::Display for AccessOutcome {
    /// Formats the outcome the way verbose trace output reports it:
    /// `hit`, `miss`, or `miss eviction`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hit => f.write_str("hit"),
            Self::MissFill => f.write_str("miss"),
            Self::MissEvict => f.write_str("miss eviction"),
        }
    }
}

/// Set-associative cache with LRU replacement.
///
/// The cache holds tags only; block contents are not modelled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cache {
    sets: Vec<CacheSet>,
    ways: usize,
}

impl Cache {
    /// Creates an empty cache (every line invalid) for `config`.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`CacheConfig::validate`].
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let num_sets = config.num_sets()?;
        info!(
            sets = num_sets,
            ways = config.ways,
            block_bits = config.block_bits,
            "cache constructed"
        );
        Ok(Self {
            sets: vec![CacheSet::new(config.ways); num_sets],
            ways: config.ways,
        })
    }

    /// Number of sets.
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Associativity (lines per set).
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// All sets, in index order.
    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    /// The set at `set_index`, if it exists.
    pub fn set(&self, set_index: usize) -> Option<&CacheSet> {
        self.sets.get(set_index)
    }

    /// Whether `tag` is resident in set `set_index`. Does not touch recency.
    pub fn contains(&self, set_index: usize, tag: u64) -> bool {
        self.set(set_index).is_some_and(|set| set.find(tag).is_some())
    }

    /// Number of valid lines across the whole cache.
    pub fn valid_lines(&self) -> usize {
        self.sets.iter().map(CacheSet::valid_count).sum()
    }

    /// Performs one access and records its outcome in `stats`.
    ///
    /// A hit increments `stats.hits`. A miss increments `stats.misses`, and
    /// additionally `stats.evictions` when a valid line had to be replaced.
    /// See [`CacheSet::access`] for the replacement rules.
    ///
    /// # Arguments
    ///
    /// * `set_index` - Set the address maps to.
    /// * `tag` - Tag of the accessed block.
    /// * `timestamp` - Fresh recency stamp for this access.
    /// * `stats` - Counters to update.
    ///
    /// # Panics
    ///
    /// Panics if `set_index >= self.num_sets()`. Indices produced by the
    /// [`AddressLayout`](crate::common::addr::AddressLayout) of the same
    /// configuration are always in range.
    pub fn access(
        &mut self,
        set_index: usize,
        tag: u64,
        timestamp: u64,
        stats: &mut CacheStats,
    ) -> AccessOutcome {
        let outcome = self.sets[set_index].access(tag, timestamp);
        stats.record(outcome);
        outcome
    }

    /// Writes one line per cache line describing its state.
    ///
    /// # Errors
    ///
    /// Propagates any error from the writer.
    pub fn dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (set_index, set) in self.sets.iter().enumerate() {
            for (way, line) in set.lines().iter().enumerate() {
                writeln!(
                    out,
                    "set: {set_index}; line: {way}, valid: {}, tag: {:#x}, recency: {}",
                    u8::from(line.is_valid()),
                    line.tag(),
                    line.recency()
                )?;
            }
        }
        Ok(())
    }
}
