//! Command-line interface
//!
//! ## Commands
//!
//! - `run` - compile libraries and run the regression described by a manifest
//! - `simulators` - list the registered simulator backends
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros. Command
//! functions return `CliResult<T>` instead of calling `process::exit`; only
//! the top-level `run()` function handles errors and exits.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::config::RunConfig;
use crate::version::HDLREG_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;


// ============================================================================
// Clap CLI definition
// ============================================================================

/// Regression-test runner for HDL simulators
#[derive(Parser, Debug)]
#[command(name = "hdlreg")]
#[command(version = HDLREG_VERSION)]
#[command(about = "Regression-test runner for HDL simulators", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile libraries and run the regression described by a manifest
    Run {
        /// Regression manifest (libraries + tests)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Simulator backend to use
        #[arg(short, long, default_value = "bluesim")]
        simulator: String,
        /// Output root for build artifacts, logs, and test dirs
        #[arg(short, long, value_name = "DIR", default_value = "hdlreg_output")]
        output_dir: PathBuf,
        /// JUnit XML report path (default: <output-dir>/report.xml)
        #[arg(short, long, value_name = "FILE")]
        report: Option<PathBuf>,
        /// Compile worker count (default: backend-specific)
        #[arg(long, value_name = "N")]
        compile_threads: Option<usize>,
        /// Number of tests simulated concurrently
        #[arg(long, value_name = "N", default_value_t = 1)]
        sim_threads: usize,
        /// Per-test simulation timeout in seconds
        #[arg(long, value_name = "SECS", default_value_t = 30 * 60)]
        timeout: u64,
        /// Recompile libraries even when already compiled
        #[arg(long)]
        force_compile: bool,
    },

    /// List the registered simulator backends
    Simulators,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Run {
            manifest,
            simulator,
            output_dir,
            report,
            compile_threads,
            sim_threads,
            timeout,
            force_compile,
        } => {
            let report_path = report.unwrap_or_else(|| output_dir.join("report.xml"));
            let config = RunConfig {
                output_path: output_dir,
                compile_threads,
                sim_threads,
                sim_timeout: Duration::from_secs(timeout),
                force_compile,
                report_path,
            };
            commands::run_regression(&manifest, &simulator, config)
        }
        Command::Simulators => commands::list_simulators(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_run() {
        let cli = Cli::try_parse_from(["hdlreg", "run", "tests.json"]).unwrap();
        if let Command::Run {
            manifest,
            simulator,
            sim_threads,
            timeout,
            ..
        } = cli.command
        {
            assert_eq!(manifest, PathBuf::from("tests.json"));
            assert_eq!(simulator, "bluesim");
            assert_eq!(sim_threads, 1);
            assert_eq!(timeout, 30 * 60);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn cli_parse_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "hdlreg",
            "run",
            "tests.json",
            "-s",
            "ghdl",
            "--sim-threads",
            "4",
            "--timeout",
            "60",
            "--force-compile",
        ])
        .unwrap();
        if let Command::Run {
            simulator,
            sim_threads,
            timeout,
            force_compile,
            ..
        } = cli.command
        {
            assert_eq!(simulator, "ghdl");
            assert_eq!(sim_threads, 4);
            assert_eq!(timeout, 60);
            assert!(force_compile);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn cli_parse_simulators() {
        let cli = Cli::try_parse_from(["hdlreg", "simulators"]).unwrap();
        assert!(matches!(cli.command, Command::Simulators));
    }
}
