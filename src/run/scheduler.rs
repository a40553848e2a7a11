//! Worker-pool compilation
//!
//! Distributes a library's file list across a fixed-size pool. The shared
//! queue is a crossbeam channel seeded with every file up front; workers pull
//! one file at a time and run the backend's compile command through the
//! process executor until the queue drains. The enclosing `thread::scope` is
//! the completion barrier: `compile_library` returns only after every
//! in-flight job has finished.
//!
//! An individual file failure is recorded in its outcome (and its build log)
//! but never aborts sibling jobs; only the inability to create the library's
//! build directories is fatal to the library.

use std::fs;
use std::path::PathBuf;
use std::thread;

use crate::config::RunConfig;
use crate::model::Library;

use super::process::{self, ExecSpec};
use super::runner::SimulatorBackend;
use super::RunError;

/// Compile result for one file.
#[derive(Debug)]
pub struct CompileOutcome {
    pub file: String,
    pub log: PathBuf,
    pub ok: bool,
}

/// Completion token for one library: every file's outcome, in completion
/// order. Aggregate failure is surfaced here for the caller to inspect, not
/// propagated mid-queue.
#[derive(Debug)]
pub struct CompileSummary {
    pub library: String,
    pub outcomes: Vec<CompileOutcome>,
}

impl CompileSummary {
    pub fn all_ok(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.ok)
    }

    pub fn failed_files(&self) -> impl Iterator<Item = &CompileOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.ok)
    }
}

/// Compile every file in `library` using a pool of workers.
///
/// Pool size comes from `config.compile_threads`, falling back to the
/// backend's default. Build directories live under
/// `<output>/library/<file>/` with a `build.log` each.
pub fn compile_library(
    backend: &dyn SimulatorBackend,
    config: &RunConfig,
    library: &Library,
) -> Result<CompileSummary, RunError> {
    let threads = config
        .compile_threads
        .unwrap_or_else(|| backend.compile_threads())
        .max(1);

    // Create every build directory up front: failure here aborts this
    // library's compile before any worker starts.
    let library_root = config.output_path.join("library");
    for file in library.files() {
        fs::create_dir_all(library_root.join(file.name().to_lowercase()))?;
    }

    tracing::info!(
        library = library.name(),
        files = library.files().len(),
        threads,
        "compiling library"
    );

    let (job_tx, job_rx) = crossbeam_channel::unbounded();
    for file in library.files() {
        // Seeding cannot fail: the receiver outlives this loop.
        let _ = job_tx.send(file);
    }
    drop(job_tx);

    let (result_tx, result_rx) = crossbeam_channel::unbounded();

    thread::scope(|scope| {
        for _ in 0..threads {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let library_root = &library_root;
            scope.spawn(move || {
                while let Ok(file) = job_rx.recv() {
                    let build_dir = library_root.join(file.name().to_lowercase());
                    let log = build_dir.join("build.log");
                    let command = backend.compile_command(file, &build_dir);

                    // Compile exit codes are not trusted; failures are
                    // diagnosed from the build log afterwards.
                    let ok = match process::run(&ExecSpec {
                        command: &command,
                        cwd: &build_dir,
                        output_file: &log,
                        timeout: None,
                        suppress_error_exit: true,
                    }) {
                        Ok(outcome) => outcome.exit_ok,
                        Err(err) => {
                            tracing::warn!(file = file.name(), %err, "compile invocation failed");
                            false
                        }
                    };

                    if !ok {
                        tracing::warn!(file = file.name(), log = %log.display(), "compile failed");
                    }
                    let _ = result_tx.send(CompileOutcome {
                        file: file.name().to_string(),
                        log,
                        ok,
                    });
                }
            });
        }
    });
    drop(result_tx);

    let outcomes: Vec<CompileOutcome> = result_rx.iter().collect();
    Ok(CompileSummary {
        library: library.name().to_string(),
        outcomes,
    })
}
