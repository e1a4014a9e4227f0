//! Trace Replayer: owns the cache, its counters and the access clock.
//!
//! Each record is decoded with the cache's [`AddressLayout`] and fed to the
//! LRU engine. Instruction fetches are skipped, loads and stores access once,
//! and modifies access twice. Every access takes a fresh timestamp from a
//! single clock, so recency is ordered across the whole run.

use std::fmt;

use tracing::{debug, info, warn};

use crate::cache::{AccessOutcome, Cache};
use crate::common::addr::AddressLayout;
use crate::common::data::AccessType;
use crate::common::error::{ConfigError, SimError, TraceError};
use crate::config::CacheConfig;
use crate::sim::trace::TraceEvent;
use crate::stats::CacheStats;

/// Timestamp handed to the first access of a replay.
///
/// Lines start with recency `0`, so every touched line is newer than any
/// untouched one.
pub const FIRST_TIMESTAMP: u64 = 1;

/// What a single trace record did to the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// Instruction fetch; the cache was not accessed.
    Skipped,
    /// Load or store; one access.
    Single(AccessOutcome),
    /// Modify; the load half and then the store half.
    Pair(AccessOutcome, AccessOutcome),
}

impl EventOutcome {
    /// Whether the record was ignored.
    pub const fn is_skipped(self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// The access outcomes in order (zero, one or two of them).
    pub fn outcomes(self) -> impl Iterator<Item = AccessOutcome> {
        let (first, second) = match self {
            Self::Skipped => (None, None),
            Self::Single(a) => (Some(a), None),
            Self::Pair(a, b) => (Some(a), Some(b)),
        };
        first.into_iter().chain(second)
    }
}

impl fmt::Display for EventOutcome {
    /// Space-separated outcomes, e.g. `miss eviction hit` for a modify.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped => Ok(()),
            Self::Single(a) => write!(f, "{a}"),
            Self::Pair(a, b) => write!(f, "{a} {b}"),
        }
    }
}

/// Drives one replay of a trace through a freshly built cache.
#[derive(Debug)]
pub struct Replayer {
    cache: Cache,
    layout: AddressLayout,
    stats: CacheStats,
    clock: u64,
}

impl Replayer {
    /// Builds an empty cache for `config`.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] for organizations that cannot be
    /// simulated; no cache is allocated in that case.
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        let layout = config.layout()?;
        let cache = Cache::new(config)?;
        Ok(Self {
            cache,
            layout,
            stats: CacheStats::new(),
            clock: FIRST_TIMESTAMP,
        })
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// The simulated cache.
    pub const fn cache(&self) -> &Cache {
        &self.cache
    }

    /// The address layout used to decode records.
    pub const fn layout(&self) -> AddressLayout {
        self.layout
    }

    /// Timestamp the next access will receive.
    pub const fn clock(&self) -> u64 {
        self.clock
    }

    /// Consumes the replayer, keeping only its counters.
    pub fn into_stats(self) -> CacheStats {
        self.stats
    }

    /// Decodes `address` and performs one access with a fresh timestamp.
    fn access(&mut self, address: u64) -> AccessOutcome {
        let decoded = self.layout.decode(address);
        let timestamp = self.clock;
        self.clock += 1;
        let outcome = self.cache.access(
            decoded.set_index as usize,
            decoded.tag,
            timestamp,
            &mut self.stats,
        );
        debug!(
            address = format_args!("{address:#x}"),
            set = decoded.set_index,
            tag = format_args!("{:#x}", decoded.tag),
            timestamp,
            %outcome,
            "access"
        );
        outcome
    }

    /// Replays a single record.
    pub fn step(&mut self, event: &TraceEvent) -> EventOutcome {
        match event.kind {
            AccessType::Instruction => {
                debug!(address = format_args!("{:#x}", event.address), "instruction fetch skipped");
                EventOutcome::Skipped
            }
            AccessType::Load | AccessType::Store => EventOutcome::Single(self.access(event.address)),
            AccessType::Modify => {
                let load = self.access(event.address);
                let store = self.access(event.address);
                EventOutcome::Pair(load, store)
            }
        }
    }

    /// Replays every record of an infallible sequence.
    pub fn run_events<I>(&mut self, events: I) -> &CacheStats
    where
        I: IntoIterator<Item = TraceEvent>,
    {
        for event in events {
            let _ = self.step(&event);
        }
        &self.stats
    }

    /// Replays records until the sequence ends or yields an error.
    ///
    /// # Errors
    ///
    /// Returns the first [`TraceError`] from `events`. Records before it
    /// have been applied and their counts remain in [`Replayer::stats`].
    pub fn run<I>(&mut self, events: I) -> Result<&CacheStats, TraceError>
    where
        I: IntoIterator<Item = Result<TraceEvent, TraceError>>,
    {
        self.run_with(events, |_, _| {})
    }

    /// Like [`Replayer::run`], calling `observer` after each applied record.
    ///
    /// # Errors
    ///
    /// Returns the first [`TraceError`] from `events`; see [`Replayer::run`].
    pub fn run_with<I, F>(&mut self, events: I, mut observer: F) -> Result<&CacheStats, TraceError>
    where
        I: IntoIterator<Item = Result<TraceEvent, TraceError>>,
        F: FnMut(&TraceEvent, EventOutcome),
    {
        for event in events {
            let event = match event {
                Ok(event) => event,
                Err(err) => {
                    warn!(error = %err, stats = %self.stats, "replay stopped on bad trace record");
                    return Err(err);
                }
            };
            let outcome = self.step(&event);
            observer(&event, outcome);
        }
        info!(
            hits = self.stats.hits,
            misses = self.stats.misses,
            evictions = self.stats.evictions,
            "replay finished"
        );
        Ok(&self.stats)
    }
}

/// Builds a cache for `config`, replays `events` through it, and returns the counters.
///
/// # Errors
///
/// Returns [`SimError::Config`] for a rejected organization or
/// [`SimError::Trace`] for the first bad record. Use [`Replayer`] directly to
/// keep the partial counters of a truncated replay.
pub fn simulate<I>(config: &CacheConfig, events: I) -> Result<CacheStats, SimError>
where
    I: IntoIterator<Item = Result<TraceEvent, TraceError>>,
{
    let mut replayer = Replayer::new(config)?;
    let _ = replayer.run(events)?;
    Ok(replayer.into_stats())
}
