//! Trace parsing and replay tests.



/// End-to-end replay scenarios with known counter totals.
pub mod scenarios;
