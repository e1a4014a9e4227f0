//! Simulation statistics collection and reporting.
//!
//! This module tracks the outcome counters of a replay. It provides:
//! 1. **Counters:** Hits, misses and evictions, each bumped once per matching outcome.
//! 2. **Derived metrics:** Total accesses, hit rate and miss rate.
//! 3. **Reporting:** The one-line `hits:<h> misses:<m> evictions:<e>` summary and a
//!    longer breakdown.

use std::fmt;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::cache::AccessOutcome;

/// Outcome counters of a replay.
///
/// Counters only ever grow. `evictions <= misses` always holds, since every
/// eviction is also a miss.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Accesses that found their block resident.
    pub hits: u64,
    /// Accesses that did not.
    pub misses: u64,
    /// Misses that replaced a valid line.
    pub evictions: u64,
}

impl CacheStats {
    /// Creates zeroed counters.
    pub const fn new() -> Self {
        Self {
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Counts one access outcome.
    #[inline]
    pub fn record(&mut self, outcome: AccessOutcome) {
        match outcome {
            AccessOutcome::Hit => self.hits += 1,
            AccessOutcome::MissFill => self.misses += 1,
            AccessOutcome::MissEvict => {
                self.misses += 1;
                self.evictions += 1;
            }
        }
    }

    /// Total accesses counted, `hits + misses`.
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of accesses that hit, or `0.0` before any access.
    pub fn hit_rate(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Fraction of accesses that missed, or `0.0` before any access.
    pub fn miss_rate(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            self.misses as f64 / total as f64
        }
    }

    /// Prints the one-line summary to stdout.
    pub fn print_summary(&self) {
        println!("{self}");
    }

    /// Writes a breakdown of the counters and derived rates.
    ///
    /// # Errors
    ///
    /// Propagates any error from the writer.
    pub fn write_breakdown<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "==========================================================")?;
        writeln!(out, "CACHE SIMULATION STATISTICS")?;
        writeln!(out, "==========================================================")?;
        writeln!(out, "accesses                 {}", self.accesses())?;
        writeln!(
            out,
            "  hits                   {} ({:.2}%)",
            self.hits,
            self.hit_rate() * 100.0
        )?;
        writeln!(
            out,
            "  misses                 {} ({:.2}%)",
            self.misses,
            self.miss_rate() * 100.0
        )?;
        writeln!(out, "  evictions              {}", self.evictions)?;
        writeln!(out, "----------------------------------------------------------")
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits:{} misses:{} evictions:{}",
            self.hits, self.misses, self.evictions
        )
    }
}
