//! Trace loading and replay.
//!
//! Provides the parser that turns valgrind memory traces into typed records
//! and the replayer that drives those records through the cache model.

/// Trace record parsing and streaming.
pub mod trace;

/// Replay of trace records against a cache.
pub mod replay;

pub use replay::{EventOutcome, Replayer, simulate};
pub use trace::{TraceEvent, TraceReader, open_trace, parse_trace};
