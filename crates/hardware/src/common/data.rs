//! Memory Access Types.
//!
//! This module defines the classification of trace records used throughout the simulator.
//! These types are used for the following:
//! 1. **Replay Dispatch:** Deciding how many cache accesses a record performs.
//! 2. **Trace Parsing:** Mapping valgrind operation letters (`I`, `L`, `S`, `M`) to kinds.
//! 3. **Verbose Output:** Printing records back in their trace form.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of memory access recorded in a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessType {
    /// Instruction fetch.
    ///
    /// Not modelled by a data cache; the replay skips it without consuming a timestamp.
    Instruction,

    /// Data load.
    ///
    /// One cache access.
    Load,

    /// Data store.
    ///
    /// One cache access. Write policy is not modelled, so a store behaves like a load.
    Store,

    /// Data modify (load followed by a store to the same address).
    ///
    /// Two consecutive cache accesses.
    Modify,
}

impl AccessType {
    /// All access kinds in trace-letter order.
    pub const ALL: [Self; 4] = [Self::Instruction, Self::Load, Self::Store, Self::Modify];

    /// Parses a valgrind operation mnemonic.
    ///
    /// # Returns
    ///
    /// The matching kind, or `None` for anything other than `I`, `L`, `S` or `M`.
    pub fn from_mnemonic(op: &str) -> Option<Self> {
        match op {
            "I" => Some(Self::Instruction),
            "L" => Some(Self::Load),
            "S" => Some(Self::Store),
            "M" => Some(Self::Modify),
            _ => None,
        }
    }

    /// The single-letter mnemonic used in trace files.
    pub const fn mnemonic(self) -> char {
        match self {
            Self::Instruction => 'I',
            Self::Load => 'L',
            Self::Store => 'S',
            Self::Modify => 'M',
        }
    }

    /// Number of data-cache accesses a record of this kind performs.
    pub const fn access_count(self) -> u64 {
        match self {
            Self::Instruction => 0,
            Self::Load | Self::Store => 1,
            Self::Modify => 2,
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}
