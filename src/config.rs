//! Run configuration
//!
//! Global settings referenced by the runner, scheduler, and report writer.
//! The values normally come from the CLI; library users can construct a
//! `RunConfig` directly.

use std::path::PathBuf;
use std::time::Duration;

/// Upper bound on a single simulation before the child process group is
/// forcibly terminated.
pub const DEFAULT_SIM_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Global settings for one regression run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Root directory for build artifacts, test working dirs, and logs.
    pub output_path: PathBuf,
    /// Compile worker count; `None` uses the backend's default.
    pub compile_threads: Option<usize>,
    /// Number of tests simulated concurrently.
    pub sim_threads: usize,
    /// Deadline for each simulate subprocess.
    pub sim_timeout: Duration,
    /// Recompile libraries even when already compiled this session.
    pub force_compile: bool,
    /// Destination for the JUnit XML report.
    pub report_path: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("hdlreg_output"),
            compile_threads: None,
            sim_threads: 1,
            sim_timeout: DEFAULT_SIM_TIMEOUT,
            force_compile: false,
            report_path: PathBuf::from("hdlreg_output/report.xml"),
        }
    }
}
