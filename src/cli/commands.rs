//! Command implementations

use std::path::Path;
use std::time::Instant;

use crate::config::RunConfig;
use crate::manifest::Manifest;
use crate::model::RunResults;
use crate::report::JunitReporter;
use crate::run::backends::{self, BACKEND_NAMES};
use crate::run::runner::SimRunner;

use super::{CliError, CliResult, ExitCode};

/// Run the full regression: compile, simulate, report.
pub fn run_regression(manifest_path: &Path, simulator: &str, config: RunConfig) -> CliResult<ExitCode> {
    let manifest = Manifest::load(manifest_path).map_err(|e| CliError::failure(e.to_string()))?;

    let backend = backends::backend_for_name(simulator).map_err(|e| {
        CliError::failure(format!(
            "{e}\nKnown simulators: {}",
            BACKEND_NAMES.join(", ")
        ))
    })?;

    let libraries = manifest.libraries();
    let tests = manifest.tests(&config.output_path);
    if tests.is_empty() {
        return Err(CliError::failure(format!(
            "No tests found in '{}'",
            manifest_path.display()
        )));
    }

    prepare_test_dirs(&tests).map_err(|e| CliError::failure(e.to_string()))?;

    let timestamp = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();
    let start = Instant::now();

    let reporter = JunitReporter::new(&config.report_path);
    let mut runner = SimRunner::new(backend, config);

    let summaries = runner.compile_all(&libraries);
    for summary in &summaries {
        for failed in summary.failed_files() {
            eprintln!(
                "compile failed: {} (see {})",
                failed.file,
                failed.log.display()
            );
        }
    }

    let tests = runner.simulate_all(tests);
    let results = RunResults::tally(&tests);
    let total_elapsed = start.elapsed();

    reporter
        .write(&tests, &results, &timestamp, total_elapsed.as_millis())
        .map_err(|e| CliError::failure(format!("Error writing report: {e}")))?;

    print_summary(&results, total_elapsed.as_secs_f64());

    if results.failing > 0 {
        // Summary already printed; exit non-zero without extra noise.
        Err(CliError::new("", ExitCode::FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// List the backend registry.
pub fn list_simulators() -> CliResult<ExitCode> {
    for name in BACKEND_NAMES {
        println!("{name}");
    }
    Ok(ExitCode::SUCCESS)
}

/// Create each test's working directory before any worker touches it.
fn prepare_test_dirs(tests: &[crate::model::Test]) -> std::io::Result<()> {
    for test in tests {
        if !test.is_skipped() {
            std::fs::create_dir_all(test.test_path())?;
        }
    }
    Ok(())
}

fn print_summary(results: &RunResults, elapsed_secs: f64) {
    let mut parts = Vec::new();
    if results.passing > 0 {
        parts.push(format!("{} passed", results.passing));
    }
    if results.failing > 0 {
        parts.push(format!("{} failed", results.failing));
    }
    if results.not_run > 0 {
        parts.push(format!("{} skipped", results.not_run));
    }
    if parts.is_empty() {
        parts.push("no tests run".to_string());
    }

    eprintln!("====== {} in {:.2}s ======", parts.join(", "), elapsed_secs);
}
