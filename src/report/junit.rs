//! JUnit XML report writer
//!
//! Emits one `testsuite` document over the final test list: per-test
//! `testcase` elements carrying the captured output in `system-out`, plus a
//! `failure` or `skipped` marker where the status calls for one. Counts are
//! computed purely from each test's status field; the injected aggregate is
//! consulted only for the "nothing was run" guard.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::{RunResults, Test, TestStatus};

const INDENT: &str = "    ";

/// Writes a regression run to a JUnit-compatible XML file.
pub struct JunitReporter {
    path: PathBuf,
}

impl JunitReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the report, iterating tests in the order supplied.
    ///
    /// Returns `Ok(false)` without touching the filesystem when the
    /// aggregate shows zero executed tests: an explicit nothing-to-report
    /// no-op, not an empty report file.
    pub fn write(
        &self,
        tests: &[Test],
        results: &RunResults,
        timestamp: &str,
        total_elapsed_ms: u128,
    ) -> io::Result<bool> {
        if results.executed() == 0 {
            tracing::info!("no tests were run, skipping report");
            return Ok(false);
        }

        let document = render(tests, timestamp, total_elapsed_ms);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, document)?;
        tracing::info!(path = %self.path.display(), "report written");
        Ok(true)
    }
}

fn render(tests: &[Test], timestamp: &str, total_elapsed_ms: u128) -> String {
    let mut failures = 0usize;
    let mut skipped = 0usize;
    for test in tests {
        match test.status() {
            TestStatus::Fail => failures += 1,
            TestStatus::NotRun => skipped += 1,
            TestStatus::Pass => {}
        }
    }

    let mut doc = String::new();
    doc.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        doc,
        "<testsuite name=\"testsuite\" errors=\"0\" timestamp=\"{}\" time=\"{}\" \
         failures=\"{}\" skipped=\"{}\" tests=\"{}\">",
        escape(timestamp),
        seconds(total_elapsed_ms),
        failures,
        skipped,
        tests.len(),
    );

    for test in tests {
        let _ = writeln!(
            doc,
            "{INDENT}<testcase name=\"{}\" file=\"{}\" time=\"{}\">",
            escape(&test.name()),
            escape(&test.source_file().display().to_string()),
            seconds(test.elapsed_ms()),
        );
        let _ = writeln!(
            doc,
            "{INDENT}{INDENT}<system-out>{}</system-out>",
            escape(test.output()),
        );
        match test.status() {
            TestStatus::Fail => {
                let _ = writeln!(doc, "{INDENT}{INDENT}<failure message=\"Failed\"/>");
            }
            TestStatus::NotRun => {
                let _ = writeln!(doc, "{INDENT}{INDENT}<skipped message=\"Skipped\"/>");
            }
            TestStatus::Pass => {}
        }
        let _ = writeln!(doc, "{INDENT}</testcase>");
    }

    doc.push_str("</testsuite>\n");
    doc
}

/// Milliseconds rendered as seconds with one decimal.
fn seconds(ms: u128) -> String {
    format!("{:.1}", ms as f64 / 1000.0)
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
