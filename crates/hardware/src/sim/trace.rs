//! Trace Loading and Parsing.
//!
//! This module turns valgrind `--tool=lackey --trace-mem=yes` output into typed
//! records. It performs:
//! 1. **Record parsing:** `<op> <hexaddress>,<size>` into a [`TraceEvent`].
//! 2. **Streaming:** [`TraceReader`] yields records lazily from any `BufRead`,
//!    tagging errors with their line number and skipping blank lines.
//! 3. **File access:** [`open_trace`] opens a trace file for streaming.
//!
//! ```text
//! I 0400d7d4,8
//!  M 0421c7f0,4
//!  L 04f6b868,8
//!  S 7ff0005c8,8
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::{self, FromStr};

use serde::{Deserialize, Serialize};

use crate::common::data::AccessType;
use crate::common::error::TraceError;

/// One decoded trace record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Kind of access.
    pub kind: AccessType,
    /// Accessed address.
    pub address: u64,
    /// Access size in bytes. Carried through for reporting; it does not
    /// affect the cache outcome.
    pub size: u32,
}

impl TraceEvent {
    /// Creates a record.
    pub const fn new(kind: AccessType, address: u64, size: u32) -> Self {
        Self {
            kind,
            address,
            size,
        }
    }

    /// A one-byte instruction fetch at `address`.
    pub const fn instruction(address: u64) -> Self {
        Self::new(AccessType::Instruction, address, 1)
    }

    /// A one-byte load from `address`.
    pub const fn load(address: u64) -> Self {
        Self::new(AccessType::Load, address, 1)
    }

    /// A one-byte store to `address`.
    pub const fn store(address: u64) -> Self {
        Self::new(AccessType::Store, address, 1)
    }

    /// A one-byte modify of `address`.
    pub const fn modify(address: u64) -> Self {
        Self::new(AccessType::Modify, address, 1)
    }
}

impl fmt::Display for TraceEvent {
    /// Formats the record in trace syntax, e.g. `L 10,1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:x},{}", self.kind, self.address, self.size)
    }
}

impl FromStr for TraceEvent {
    type Err = TraceError;

    /// Parses one record. Surrounding whitespace is ignored, and the address
    /// may carry a `0x` prefix. Errors carry line `0`; [`TraceReader`]
    /// replaces it with the real line number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let record = s.trim();
        let malformed = |reason: &'static str| TraceError::Malformed {
            line: 0,
            record: record.to_owned(),
            reason,
        };

        let (op, operands) = record
            .split_once(char::is_whitespace)
            .ok_or_else(|| malformed("expected `<op> <address>,<size>`"))?;
        let kind = AccessType::from_mnemonic(op).ok_or_else(|| TraceError::UnknownOperation {
            line: 0,
            op: op.to_owned(),
        })?;

        let (address, size) = operands
            .trim()
            .split_once(',')
            .ok_or_else(|| malformed("missing `,<size>` after the address"))?;
        let address = address.trim();
        let digits = address
            .strip_prefix("0x")
            .or_else(|| address.strip_prefix("0X"))
            .unwrap_or(address);
        // `from_str_radix` and `parse` both accept a leading `+`.
        if !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
            return Err(malformed("address is not hexadecimal"));
        }
        let address =
            u64::from_str_radix(digits, 16).map_err(|_| malformed("address is not hexadecimal"))?;
        let size = size.trim();
        if !size.bytes().all(|c| c.is_ascii_digit()) {
            return Err(malformed("size is not a decimal integer"));
        }
        let size = size
            .parse::<u32>()
            .map_err(|_| malformed("size is not a decimal integer"))?;

        Ok(Self::new(kind, address, size))
    }
}

/// Lazy iterator over the records of a trace.
///
/// Blank lines are skipped. Every other line yields either a [`TraceEvent`]
/// or a [`TraceError`] naming the 1-based line it came from; a line that is
/// not valid UTF-8 is reported as malformed.
#[derive(Debug)]
pub struct TraceReader<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered reader.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
        }
    }

    /// Number of lines consumed so far, blank lines included.
    pub const fn lines_read(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceEvent, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line_no += 1,
                Err(e) => return Some(Err(TraceError::Io(e))),
            }
            let Ok(line) = str::from_utf8(&self.buf) else {
                return Some(Err(TraceError::Malformed {
                    line: self.line_no,
                    record: String::from_utf8_lossy(&self.buf).trim().to_owned(),
                    reason: "record is not valid UTF-8",
                }));
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(
                line.parse::<TraceEvent>()
                    .map_err(|e| e.with_line(self.line_no)),
            );
        }
    }
}

/// Streams the records of an in-memory trace.
pub fn parse_trace(text: &str) -> TraceReader<&[u8]> {
    TraceReader::new(text.as_bytes())
}

/// Opens a trace file for streaming.
///
/// # Errors
///
/// Returns [`TraceError::Io`] if the file cannot be opened.
pub fn open_trace<P: AsRef<Path>>(path: P) -> Result<TraceReader<BufReader<File>>, TraceError> {
    let file = File::open(path)?;
    Ok(TraceReader::new(BufReader::new(file)))
}
