//! Runner contract and orchestration
//!
//! `SimulatorBackend` is the whole extension surface a simulator variant has
//! to supply: command construction, pattern definitions, and a couple of
//! naming/threading knobs. `SimRunner` owns everything else - library
//! compilation through the scheduler, deadline-bounded simulation through the
//! process executor, classification, and result recording - so a backend
//! cannot break timeout safety or output capture.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use crate::config::RunConfig;
use crate::model::{HdlFile, Library, Test, TestStatus};

use super::patterns::PatternSet;
use super::process::{self, ExecSpec};
use super::scheduler::{self, CompileSummary};
use super::RunError;

/// Capability contract for one simulator variant.
///
/// Implementations are selected by name at startup (see
/// [`super::backends::backend_for_name`]) and shared read-only across
/// workers.
pub trait SimulatorBackend: std::fmt::Debug + Send + Sync {
    /// Registry name, also used in logs.
    fn name(&self) -> &'static str;

    /// Compile worker count when the configuration does not override it.
    fn compile_threads(&self) -> usize {
        thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
    }

    /// The error/warning/success classification patterns.
    fn patterns(&self) -> &PatternSet;

    /// Command line compiling one file into `build_dir`.
    fn compile_command(&self, file: &HdlFile, build_dir: &Path) -> Vec<String>;

    /// Command line simulating one test. Pure function of test identity.
    fn simulate_command(&self, test: &Test, output_root: &Path) -> Vec<String>;

    /// Build artifact that must exist before `simulate_command` can run.
    fn build_artifact(&self, test: &Test, output_root: &Path) -> PathBuf;

    /// Human-readable invocation name for logs and reports.
    fn descriptive_name(&self, test: &Test) -> String {
        format!("{}.{}", test.library(), test.testbench())
    }
}

/// Orchestrates one regression: compile all required libraries, then run and
/// classify each test.
pub struct SimRunner {
    backend: Box<dyn SimulatorBackend>,
    config: RunConfig,
    /// Libraries compiled successfully this session; compilation is
    /// idempotent unless `force_compile` is set.
    compiled: HashSet<String>,
}

impl SimRunner {
    pub fn new(backend: Box<dyn SimulatorBackend>, config: RunConfig) -> Self {
        Self {
            backend,
            config,
            compiled: HashSet::new(),
        }
    }

    pub fn backend(&self) -> &dyn SimulatorBackend {
        self.backend.as_ref()
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Compile every library through the scheduler.
    ///
    /// A library that already compiled successfully this session is skipped
    /// without side effects unless the configuration forces recompilation.
    /// A fatal condition (such as an uncreatable build directory) aborts
    /// only that library; its summary is simply absent from the result.
    pub fn compile_all(&mut self, libraries: &[Library]) -> Vec<CompileSummary> {
        let mut summaries = Vec::new();
        for library in libraries {
            if !self.config.force_compile && self.compiled.contains(library.name()) {
                tracing::debug!(library = library.name(), "already compiled, skipping");
                continue;
            }
            match scheduler::compile_library(self.backend.as_ref(), &self.config, library) {
                Ok(summary) => {
                    if summary.all_ok() {
                        self.compiled.insert(library.name().to_string());
                    }
                    summaries.push(summary);
                }
                Err(err) => {
                    tracing::error!(library = library.name(), %err, "library compile aborted");
                }
            }
        }
        summaries
    }

    /// Execute one test and record status, elapsed time, and output on it.
    ///
    /// Run errors never propagate: a missing working directory or build
    /// artifact, a deadline expiry, or a spawn failure all resolve to FAIL
    /// with the cause captured in the test's output.
    pub fn run_test(&self, test: &mut Test) {
        let name = self.backend.descriptive_name(test);
        let test_dir = test.test_path().to_path_buf();

        if !test_dir.is_dir() {
            self.fail_fast(test, &name, RunError::WorkingDirMissing(test_dir));
            return;
        }
        let artifact = self.backend.build_artifact(test, &self.config.output_path);
        if !artifact.exists() {
            self.fail_fast(test, &name, RunError::MissingBuildArtifact(artifact));
            return;
        }

        let command = self.backend.simulate_command(test, &self.config.output_path);
        let log = test_dir.join("run.log");
        tracing::info!(test = %name, simulator = self.backend.name(), "starting simulation");

        let start = Instant::now();
        // Simulators often exit non-zero on assertion counts that are still
        // meaningful PASS/FAIL signals, so the exit code is suppressed here
        // and weighed by the classifier instead.
        let result = process::run(&ExecSpec {
            command: &command,
            cwd: &test_dir,
            output_file: &log,
            timeout: Some(self.config.sim_timeout),
            suppress_error_exit: true,
        });
        let elapsed = start.elapsed();

        let (status, output) = match result {
            Ok(outcome) => {
                let status = self.backend.patterns().classify(&outcome.output, outcome.exit_ok);
                let warnings = self.backend.patterns().warning_count(&outcome.output);
                if warnings > 0 {
                    tracing::warn!(test = %name, warnings, "simulator reported warnings");
                }
                (status, outcome.output)
            }
            Err(err @ RunError::Timeout(_)) => {
                // Partial output survives in the log; append the cause so the
                // report shows why the run stopped.
                let mut output = process::read_log(&log);
                output.push_str(&format!("\n{err}\n"));
                (TestStatus::Fail, output)
            }
            Err(err) => (TestStatus::Fail, format!("{err}\n")),
        };

        tracing::info!(test = %name, ?status, elapsed_ms = elapsed.as_millis() as u64, "simulation done");
        test.record_result(status, elapsed, output);
    }

    /// Run every non-skipped test, several at a time.
    ///
    /// Each test is moved into exactly one worker for the duration of its
    /// run and handed back once its status is set; results come back in the
    /// insertion order of the input list regardless of completion order.
    pub fn simulate_all(&self, tests: Vec<Test>) -> Vec<Test> {
        let total = tests.len();
        let threads = self.config.sim_threads.max(1).min(total.max(1));

        let (job_tx, job_rx) = crossbeam_channel::unbounded();
        for indexed in tests.into_iter().enumerate() {
            let _ = job_tx.send(indexed);
        }
        drop(job_tx);

        let (done_tx, done_rx) = crossbeam_channel::unbounded();

        thread::scope(|scope| {
            for _ in 0..threads {
                let job_rx = job_rx.clone();
                let done_tx = done_tx.clone();
                scope.spawn(move || {
                    while let Ok((index, mut test)) = job_rx.recv() {
                        if test.is_skipped() {
                            tracing::debug!(test = %test.name(), "skipped by selection");
                        } else {
                            self.run_test(&mut test);
                        }
                        let _ = done_tx.send((index, test));
                    }
                });
            }
        });
        drop(done_tx);

        let mut slots: Vec<Option<Test>> = (0..total).map(|_| None).collect();
        for (index, test) in done_rx.iter() {
            slots[index] = Some(test);
        }
        slots.into_iter().flatten().collect()
    }

    fn fail_fast(&self, test: &mut Test, name: &str, err: RunError) {
        tracing::error!(test = %name, %err, "cannot run test");
        test.record_result(TestStatus::Fail, std::time::Duration::ZERO, format!("{err}\n"));
    }
}
