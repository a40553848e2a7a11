//! Data model for a regression run
//!
//! The entities here are produced by external test discovery (fed in through
//! the manifest) and consumed by the runner and report writer:
//!
//! - `Library` / `HdlFile` - compile units, read-only during a run
//! - `TestCase` / `Test` - one runtime execution unit per testbench/testcase pair
//! - `TestStatus` - closed PASS/FAIL/NOT_RUN enumeration
//! - `RunResults` - aggregate pass/fail/skip counters
//!
//! A `Test` is mutated exactly once per run: `record_result` writes status,
//! elapsed time, and captured output together, and the entity is read-only
//! afterwards.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Final status of a test, `NotRun` until classification decides otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestStatus {
    Pass,
    Fail,
    #[default]
    NotRun,
}

/// One HDL source file plus its simulator-specific compile options.
///
/// Immutable once scanned; the ordering of `com_options` is preserved as
/// given because simulators treat flag order as significant.
#[derive(Debug, Clone)]
pub struct HdlFile {
    name: String,
    path: PathBuf,
    com_options: Vec<String>,
}

impl HdlFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, com_options: Vec<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            com_options,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn com_options(&self) -> &[String] {
        &self.com_options
    }
}

/// A named collection of HDL files compiled together into one simulation
/// target. Owned by the project; read-only during a run.
#[derive(Debug, Clone)]
pub struct Library {
    name: String,
    files: Vec<HdlFile>,
}

impl Library {
    pub fn new(name: impl Into<String>, files: Vec<HdlFile>) -> Self {
        Self {
            name: name.into(),
            files,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn files(&self) -> &[HdlFile] {
        &self.files
    }
}

/// A named scenario inside a testbench module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    name: String,
}

impl TestCase {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One runtime unit pairing a testbench instance with a testcase.
///
/// Created by the test builder before any run; the runner takes exclusive
/// ownership of a `Test` while it executes and hands it back with status,
/// elapsed time, and captured output recorded.
#[derive(Debug, Clone)]
pub struct Test {
    library: String,
    testbench: String,
    testcase: TestCase,
    source_file: PathBuf,
    test_path: PathBuf,
    skipped: bool,
    status: TestStatus,
    elapsed: Duration,
    output: String,
}

impl Test {
    pub fn new(
        library: impl Into<String>,
        testbench: impl Into<String>,
        testcase: TestCase,
        source_file: impl Into<PathBuf>,
        test_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            library: library.into(),
            testbench: testbench.into(),
            testcase,
            source_file: source_file.into(),
            test_path: test_path.into(),
            skipped: false,
            status: TestStatus::NotRun,
            elapsed: Duration::ZERO,
            output: String::new(),
        }
    }

    pub fn library(&self) -> &str {
        &self.library
    }

    pub fn testbench(&self) -> &str {
        &self.testbench
    }

    pub fn testcase(&self) -> &TestCase {
        &self.testcase
    }

    /// Fully qualified test name, `<library>.<testbench>.<testcase>`.
    pub fn name(&self) -> String {
        format!("{}.{}.{}", self.library, self.testbench, self.testcase.name())
    }

    /// Source-file reference emitted in the report.
    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    /// Working directory for this test's run (holds `run.log`).
    pub fn test_path(&self) -> &Path {
        &self.test_path
    }

    /// Mark this test as excluded by upstream selection; it stays `NotRun`
    /// and the runner never executes it.
    pub fn set_skipped(&mut self, skipped: bool) {
        self.skipped = skipped;
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    pub fn status(&self) -> TestStatus {
        self.status
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// Record the outcome of one execution. Status, timing, and output are
    /// written together so a reported test is never half-updated.
    pub fn record_result(&mut self, status: TestStatus, elapsed: Duration, output: String) {
        self.status = status;
        self.elapsed = elapsed;
        self.output = output;
    }
}

/// Aggregate pass/fail/skip counters over a completed run.
///
/// Built fresh from the final test list; injected into the report writer
/// rather than living as ambient global state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunResults {
    pub passing: usize,
    pub failing: usize,
    pub not_run: usize,
}

impl RunResults {
    /// Tally counters from the status field of each test.
    pub fn tally(tests: &[Test]) -> Self {
        let mut results = Self::default();
        for test in tests {
            match test.status() {
                TestStatus::Pass => results.passing += 1,
                TestStatus::Fail => results.failing += 1,
                TestStatus::NotRun => results.not_run += 1,
            }
        }
        results
    }

    /// Number of tests that actually executed this run.
    pub fn executed(&self) -> usize {
        self.passing + self.failing
    }

    /// Total test count; equals the length of the tallied test list.
    pub fn total(&self) -> usize {
        self.passing + self.failing + self.not_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_entity(name: &str) -> Test {
        Test::new(
            "work",
            "tb_uart",
            TestCase::new(name),
            format!("test/{name}.bsv"),
            format!("out/test/{name}"),
        )
    }

    #[test]
    fn status_defaults_to_not_run() {
        let test = test_entity("tc_basic");
        assert_eq!(test.status(), TestStatus::NotRun);
        assert_eq!(test.elapsed(), Duration::ZERO);
        assert!(test.output().is_empty());
    }

    #[test]
    fn record_result_sets_all_fields() {
        let mut test = test_entity("tc_basic");
        test.record_result(TestStatus::Pass, Duration::from_millis(1500), "Finished test".into());
        assert_eq!(test.status(), TestStatus::Pass);
        assert_eq!(test.elapsed_ms(), 1500);
        assert_eq!(test.output(), "Finished test");
    }

    #[test]
    fn tally_counts_match_list_length() {
        let mut a = test_entity("a");
        let mut b = test_entity("b");
        let c = test_entity("c");
        a.record_result(TestStatus::Pass, Duration::from_millis(10), String::new());
        b.record_result(TestStatus::Fail, Duration::from_millis(10), String::new());

        let results = RunResults::tally(&[a, b, c]);
        assert_eq!(results.passing, 1);
        assert_eq!(results.failing, 1);
        assert_eq!(results.not_run, 1);
        assert_eq!(results.executed(), 2);
        assert_eq!(results.total(), 3);
    }
}
