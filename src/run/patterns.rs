//! Pattern-based result classification
//!
//! Each backend supplies three compiled patterns: error, warning, and the
//! success (user-selected result) check. Classification runs over the full
//! captured output line by line, only after the process has finished, so
//! buffering granularity during capture cannot produce partial-match false
//! positives.

use regex::Regex;

use crate::model::TestStatus;

use super::RunError;

/// The three classification patterns for one simulator.
///
/// Immutable after construction and safely shared read-only across workers.
#[derive(Debug, Clone)]
pub struct PatternSet {
    error: Regex,
    warning: Regex,
    success: Regex,
}

impl PatternSet {
    /// Compile a backend's pattern definitions.
    pub fn compile(error: &str, warning: &str, success: &str) -> Result<Self, RunError> {
        Ok(Self {
            error: Regex::new(error)?,
            warning: Regex::new(warning)?,
            success: Regex::new(success)?,
        })
    }

    /// Decide a test's final status from captured output and exit state.
    ///
    /// PASS requires a success match with no error match anywhere in the
    /// output. An error match is FAIL regardless of exit code, and output
    /// matching neither pattern is FAIL by policy, never a silent PASS.
    pub fn classify(&self, output: &str, exit_ok: bool) -> TestStatus {
        let mut matched_error = false;
        let mut matched_success = false;
        for line in output.lines() {
            if self.error.is_match(line) {
                matched_error = true;
            }
            if self.success.is_match(line) {
                matched_success = true;
            }
        }

        if matched_success && !matched_error {
            return TestStatus::Pass;
        }
        if matched_error || !exit_ok {
            return TestStatus::Fail;
        }
        // Ambiguous: ran to completion but never reported a result.
        TestStatus::Fail
    }

    /// Number of lines matching the warning pattern, for log diagnostics.
    pub fn warning_count(&self, output: &str) -> usize {
        output.lines().filter(|line| self.warning.is_match(line)).count()
    }
}
