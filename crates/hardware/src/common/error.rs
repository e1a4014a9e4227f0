//! Error definitions.
//!
//! This module defines the error types for the simulator. It provides:
//! 1. **Configuration Errors:** Cache organizations rejected before any cache is built.
//! 2. **Trace Errors:** Malformed or unreadable trace records reported by the parser.
//! 3. **Simulation Errors:** An umbrella type for callers that build and replay in one go.
//!
//! Nothing inside a cache access can fail; every error here is raised either
//! before the replay starts or by the record source feeding it.

use std::io;

use thiserror::Error;

/// A cache organization that cannot be simulated.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Associativity of zero: a set would hold no lines.
    #[error("associativity must be at least 1 line per set")]
    ZeroAssociativity,

    /// Block-offset and set-index fields do not fit in a 64-bit address.
    #[error(
        "block bits ({block_bits}) plus set bits ({set_bits}) exceed the 64-bit address width"
    )]
    AddressBitsOverflow {
        /// Requested block-offset bits.
        block_bits: u32,
        /// Requested set-index bits.
        set_bits: u32,
    },

    /// The line array for this organization is larger than the host can address.
    #[error("2^{set_bits} sets of {ways} lines are too large to allocate")]
    CapacityOverflow {
        /// Requested set-index bits.
        set_bits: u32,
        /// Requested associativity.
        ways: usize,
    },

    /// A configuration document could not be deserialized.
    #[error("invalid configuration document: {0}")]
    Parse(String),
}

/// A trace record that could not be turned into a [`TraceEvent`](crate::sim::trace::TraceEvent).
///
/// Line numbers are 1-based; `0` means the record was parsed on its own,
/// outside of a [`TraceReader`](crate::sim::trace::TraceReader).
#[derive(Debug, Error)]
pub enum TraceError {
    /// The record does not have the `<op> <hexaddress>,<size>` shape.
    #[error("line {line}: malformed trace record `{record}`: {reason}")]
    Malformed {
        /// Line the record was read from.
        line: usize,
        /// The offending record, trimmed.
        record: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// The operation letter is not one of `I`, `L`, `S`, `M`.
    #[error("line {line}: unknown trace operation `{op}`")]
    UnknownOperation {
        /// Line the record was read from.
        line: usize,
        /// The unrecognised operation field.
        op: String,
    },

    /// The trace source could not be read.
    #[error("failed to read trace: {0}")]
    Io(#[from] io::Error),
}

impl TraceError {
    /// Attaches a line number to a record-level error.
    ///
    /// I/O errors carry no line and are returned unchanged.
    #[must_use]
    pub fn with_line(self, line: usize) -> Self {
        match self {
            Self::Malformed { record, reason, .. } => Self::Malformed {
                line,
                record,
                reason,
            },
            Self::UnknownOperation { op, .. } => Self::UnknownOperation { line, op },
            io @ Self::Io(_) => io,
        }
    }

    /// Line the error was found on, if it refers to a single record.
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::Malformed { line, .. } | Self::UnknownOperation { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }
}

/// Any failure of an end-to-end simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// The cache organization was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The trace could not be opened or parsed.
    #[error(transparent)]
    Trace(#[from] TraceError),
}
