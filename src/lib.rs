#![forbid(unsafe_code)]
//! HDL Regression Runner
//!
//! A pluggable regression-test execution engine for hardware-design
//! simulators: compiles simulation libraries in parallel, runs per-backend
//! simulator subprocesses under a deadline, classifies each test's outcome
//! by scanning captured output, and serializes the result set into a
//! JUnit-compatible XML report.
//!
//! Simulator backends implement one capability trait
//! ([`run::runner::SimulatorBackend`]) supplying command templates and
//! classification patterns; the shared skeleton owns concurrency, timeout
//! safety, output capture, and result recording.
//!
//! ## Panic Policy
//!
//! Production code uses `Result` with `?`; `.unwrap()` and `.expect()` are
//! acceptable in tests only.

pub mod cli;
pub mod config;
pub mod manifest;
pub mod model;
pub mod report;
pub mod run;
pub mod version;

pub use config::RunConfig;
pub use manifest::Manifest;
pub use model::{HdlFile, Library, RunResults, Test, TestCase, TestStatus};
pub use report::JunitReporter;
pub use run::RunError;
pub use run::backends::backend_for_name;
pub use run::patterns::PatternSet;
pub use run::runner::{SimRunner, SimulatorBackend};
