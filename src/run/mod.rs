//! Test execution core
//!
//! One shared concurrency and process-management skeleton that simulator
//! backends plug into:
//!
//! - `process` - subprocess execution with log capture and deadline kill
//! - `patterns` - regex classification of captured output
//! - `scheduler` - worker-pool compilation of a library's file list
//! - `runner` - the `SimulatorBackend` contract and run orchestration
//! - `backends` - the named backend variants
//!
//! Backends only supply command construction and pattern definitions; timeout
//! safety, output capture, and result classification live here and cannot be
//! overridden.

pub mod backends;
pub mod patterns;
pub mod process;
pub mod runner;
pub mod scheduler;

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors raised by the execution core.
///
/// Each failure condition is a distinct kind; callers match on the variant
/// rather than parsing messages.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("working directory missing: {0}")]
    WorkingDirMissing(PathBuf),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("process exited with code {0}")]
    NonZeroExit(i32),

    #[error("missing build artifact: {0} (compile never ran or failed)")]
    MissingBuildArtifact(PathBuf),

    #[error("unknown simulator: {0}")]
    UnknownSimulator(String),

    #[error("invalid classification pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
