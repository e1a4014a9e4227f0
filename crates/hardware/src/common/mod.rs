//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides the building blocks shared by the cache model and the
//! replay driver. It includes:
//! 1. **Address Decoding:** Splitting an address into tag, set index and offset.
//! 2. **Access Kinds:** The instruction/load/store/modify classification of trace records.
//! 3. **Error Handling:** Configuration, trace and simulation error types.

/// Address decomposition (tag, set index, block offset).
pub mod addr;

/// Trace record access kinds.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{AddressLayout, DecodedAddr, decode};
pub use data::AccessType;
pub use error::{ConfigError, SimError, TraceError};
