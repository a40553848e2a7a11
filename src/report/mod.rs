//! Run reporting
//!
//! Serializes the final test list and aggregate counters into artifacts CI
//! systems consume. Currently one format: JUnit-compatible XML.

pub mod junit;

pub use junit::JunitReporter;
