//! Subprocess execution with log capture and deadline kill
//!
//! Runs one external command with stdout and stderr combined into a single
//! log file. The child writes to the log directly, so the file is present
//! even when the command times out or fails and post-mortem output is always
//! available.
//!
//! Timeouts poll `try_wait` rather than blocking in `wait`; on expiry the
//! child's whole process group is terminated so simulator wrapper scripts do
//! not leave orphaned children behind.

use std::fs::{self, File};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use super::RunError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// One command invocation: argv, working directory, log destination, and
/// execution policy.
#[derive(Debug)]
pub struct ExecSpec<'a> {
    pub command: &'a [String],
    pub cwd: &'a Path,
    pub output_file: &'a Path,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// When set, a non-zero exit code is reported through `ExecOutcome`
    /// instead of an error; the caller's classifier decides what it means.
    pub suppress_error_exit: bool,
}

/// Result of a completed (non-timed-out) invocation.
#[derive(Debug)]
pub struct ExecOutcome {
    /// Whether the process exited with code zero. Only ever `false` when the
    /// spec suppressed error exits.
    pub exit_ok: bool,
    /// Combined stdout/stderr, read back from the log file.
    pub output: String,
}

/// Run one external command to completion.
///
/// Failure conditions are reported as distinct [`RunError`] kinds: missing
/// working directory, executable not found, deadline expiry, and non-zero
/// exit (when not suppressed). The log file at `output_file` is written in
/// every case that reaches `spawn`.
pub fn run(spec: &ExecSpec<'_>) -> Result<ExecOutcome, RunError> {
    let (program, args) = spec
        .command
        .split_first()
        .ok_or_else(|| RunError::CommandNotFound(String::from("<empty command>")))?;

    if !spec.cwd.is_dir() {
        return Err(RunError::WorkingDirMissing(spec.cwd.to_path_buf()));
    }
    if let Some(parent) = spec.output_file.parent() {
        fs::create_dir_all(parent)?;
    }

    let log = File::create(spec.output_file)?;
    let log_err = log.try_clone()?;

    let mut command = Command::new(program);
    command
        .args(args)
        .current_dir(spec.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::from(log))
        .stderr(Stdio::from(log_err));

    // Own process group, so a deadline kill reaches descendants too.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    let mut child = command.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RunError::CommandNotFound(program.clone())
        } else {
            RunError::Io(e)
        }
    })?;

    let status = match spec.timeout {
        Some(deadline) => {
            let start = Instant::now();
            loop {
                match child.try_wait()? {
                    Some(status) => break status,
                    None => {
                        if start.elapsed() > deadline {
                            kill_tree(&mut child);
                            return Err(RunError::Timeout(deadline));
                        }
                        std::thread::sleep(POLL_INTERVAL);
                    }
                }
            }
        }
        None => child.wait()?,
    };

    let output = read_log(spec.output_file);
    let exit_ok = status.success();

    if !exit_ok && !spec.suppress_error_exit {
        return Err(RunError::NonZeroExit(status.code().unwrap_or(-1)));
    }

    Ok(ExecOutcome { exit_ok, output })
}

/// Read captured output back from a log file, tolerating non-UTF-8 bytes.
pub fn read_log(path: &Path) -> String {
    fs::read(path)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

/// Terminate the child and everything it spawned.
#[cfg(unix)]
fn kill_tree(child: &mut Child) {
    // The child leads its own process group (see `process_group(0)` above);
    // signal the group id, then reap the direct child.
    let group = format!("-{}", child.id());
    let _ = Command::new("kill")
        .args(["-s", "KILL", "--", &group])
        .status();
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(not(unix))]
fn kill_tree(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
