//! Trace-driven set-associative cache simulator library.
//!
//! This crate replays recorded memory accesses against a simulated cache and
//! counts hits, misses and evictions. It provides the following:
//! 1. **Cache:** `2^s` sets of `E` lines with least-recently-used replacement.
//! 2. **Addressing:** Decomposition of an address into tag, set index and block offset.
//! 3. **Trace:** Parsing of valgrind `<op> <hexaddress>,<size>` records.
//! 4. **Simulation:** A replayer that feeds records to the cache in order.
//! 5. **Statistics:** Outcome counters and the summary report.
//!
//! ```
//! use csim_core::{CacheConfig, Replayer};
//! use csim_core::sim::parse_trace;
//!
//! let config = CacheConfig::new(0, 2, 0);
//! let mut replayer = Replayer::new(&config)?;
//! let stats = replayer.run(parse_trace(" L 0,1\n L 1,1\n L 0,1\n L 1,1\n"))?;
//! assert_eq!(stats.to_string(), "hits:2 misses:2 evictions:0");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Set-associative cache model and LRU replacement.
pub mod cache;
/// Common types (address decoding, access kinds, errors).
pub mod common;
/// Cache organization and its validation.
pub mod config;
/// Trace parsing and replay.
pub mod sim;
/// Hit/miss/eviction counters and reporting.
pub mod stats;

/// The simulated cache; build with `Cache::new`.
pub use crate::cache::{AccessOutcome, Cache};
/// Cache organization (`s`, `E`, `b`).
pub use crate::config::CacheConfig;
/// Replay driver owning a cache and its counters.
pub use crate::sim::Replayer;
/// Outcome counters.
pub use crate::stats::CacheStats;
