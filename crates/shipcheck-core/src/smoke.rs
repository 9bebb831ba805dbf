//! Smoke testing of staged binaries.
//!
//! A smoke test spawns the binary with a fixed argument list, waits for it
//! under a bounded timeout and records exit status plus captured output.
//! Output is never interpreted; only the exit status decides success.

use std::io::{ErrorKind, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;
use serde::{Deserialize, Serialize};
use wait_timeout::ChildExt;

use crate::error::{Result, VerifyError};

/// Mandatory invocation: must exit 0.
pub const HELP_ARGS: &[&str] = &["--help"];

/// Advisory invocation: a nonzero exit is only a warning.
pub const VERSION_ARGS: &[&str] = &["--version"];

/// Result of one smoke invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmokeTestOutcome {
    pub args: Vec<String>,
    /// `None` when the process was killed by a signal or timed out.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub elapsed_ms: u64,
    pub timed_out: bool,
}

impl SmokeTestOutcome {
    pub fn succeeded(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    pub fn command_line(&self) -> String {
        self.args.join(" ")
    }

    /// Convert a failed outcome into the matching error.
    pub fn check(&self, timeout: Duration) -> Result<()> {
        if self.timed_out {
            return Err(VerifyError::Timeout {
                args: self.command_line(),
                timeout,
            });
        }
        if self.exit_code != Some(0) {
            return Err(VerifyError::SmokeFailed {
                args: self.command_line(),
                code: self.exit_code,
            });
        }
        Ok(())
    }
}

/// Runs staged binaries under a bounded wait.
#[derive(Debug, Clone, Copy)]
pub struct SmokeTester {
    timeout: Duration,
}

impl SmokeTester {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Spawn `path` with `args` and wait for it to exit.
    ///
    /// Only a failure to start the process is an error; nonzero exits and
    /// timeouts are reported through the outcome. A timed-out child is
    /// killed and reaped before returning.
    ///
    /// Output collection shares the timeout: pipes still held open by
    /// background processes the binary left behind are abandoned at the
    /// deadline, keeping whatever was read so far.
    pub fn smoke_test(&self, path: &Path, args: &[&str]) -> Result<SmokeTestOutcome> {
        let started = Instant::now();
        let deadline = started + self.timeout;
        let mut child = Command::new(path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| VerifyError::Spawn {
                path: path.to_path_buf(),
                source,
            })?;

        // Drain both pipes concurrently so a chatty child cannot block on a
        // full pipe while we wait for it.
        let stdout = PipeCapture::start(child.stdout.take());
        let stderr = PipeCapture::start(child.stderr.take());

        let status = wait_bounded(&mut child, self.timeout).map_err(|source| {
            VerifyError::Spawn {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let stdout = PipeCapture::finish(stdout, deadline);
        let stderr = PipeCapture::finish(stderr, deadline);
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let outcome = SmokeTestOutcome {
            args: args.iter().map(|a| a.to_string()).collect(),
            exit_code: status.and_then(|s| s.code()),
            stdout,
            stderr,
            elapsed_ms,
            timed_out: status.is_none(),
        };

        debug!(
            "{} {}: exit={:?} timed_out={} stdout={:?} stderr={:?}",
            path.display(),
            outcome.command_line(),
            outcome.exit_code,
            outcome.timed_out,
            outcome.stdout,
            outcome.stderr
        );
        Ok(outcome)
    }
}

/// Extra time granted to pipe readers once the deadline has passed, so
/// output written just before exit or kill is still picked up.
const DRAIN_GRACE: Duration = Duration::from_millis(100);

fn wait_bounded(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    match child.wait_timeout(timeout)? {
        Some(status) => Ok(Some(status)),
        None => {
            let _ = child.kill();
            let _ = child.wait();
            Ok(None)
        }
    }
}

/// Background reader appending a pipe's bytes into a shared buffer.
struct PipeCapture {
    buf: Arc<Mutex<Vec<u8>>>,
    done: Receiver<()>,
}

impl PipeCapture {
    fn start<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Self> {
        pipe.map(|mut reader| {
            let buf = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&buf);
            let (tx, done) = mpsc::channel();

            thread::spawn(move || {
                let mut chunk = [0u8; 8192];
                loop {
                    match reader.read(&mut chunk) {
                        Ok(0) => break,
                        Ok(n) => lock(&sink).extend_from_slice(&chunk[..n]),
                        Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                        Err(_) => break,
                    }
                }
                let _ = tx.send(());
            });

            Self { buf, done }
        })
    }

    /// Wait for EOF until `deadline` (at least `DRAIN_GRACE`), then return
    /// what has been read. A reader still running is left detached.
    fn finish(capture: Option<Self>, deadline: Instant) -> String {
        let Some(capture) = capture else {
            return String::new();
        };

        let budget = deadline
            .saturating_duration_since(Instant::now())
            .max(DRAIN_GRACE);
        let _ = capture.done.recv_timeout(budget);

        String::from_utf8_lossy(&lock(&capture.buf)).into_owned()
    }
}

fn lock(buf: &Mutex<Vec<u8>>) -> MutexGuard<'_, Vec<u8>> {
    buf.lock().unwrap_or_else(|e| e.into_inner())
}
