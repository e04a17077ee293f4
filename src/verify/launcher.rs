//! Low-level build process execution

use std::io::Read;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use wait_timeout::ChildExt;

use super::cancel::CancelToken;
use super::command::InvocationSpec;
use crate::config::{CheckerConfig, DEFAULT_POLL_INTERVAL, DEFAULT_TERMINATION_GRACE};
use crate::error::CheckError;
use crate::process::{isolate_process_group, terminate_child};

/// How long to keep draining the pipes once the child is gone. Background
/// processes the wrapper leaves behind can hold them open indefinitely.
const OUTPUT_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Captured output of one build process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    /// Exit code, `None` when killed by a signal or cancelled
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// The process was stopped because the check was cancelled
    pub cancelled: bool,
}

impl RawOutput {
    pub fn stdout_lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LaunchOptions {
    /// How often the blocked wait looks at the cancellation token
    pub poll_interval: Duration,
    /// Time between SIGTERM and SIGKILL on cancellation
    pub termination_grace: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            termination_grace: DEFAULT_TERMINATION_GRACE,
        }
    }
}

impl From<&CheckerConfig> for LaunchOptions {
    fn from(config: &CheckerConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            termination_grace: config.termination_grace(),
        }
    }
}

/// Start the build and block until it exits or the check is cancelled.
///
/// Returns [`CheckError::Launch`] if the process could not be started or
/// waited on (missing wrapper, permission denied, ...). This is the only place
/// where an OS error is turned into a value; everything downstream works on
/// `RawOutput`.
pub fn launch(
    spec: &InvocationSpec,
    cancel: &CancelToken,
    options: &LaunchOptions,
) -> Result<RawOutput, CheckError> {
    if cancel.is_cancelled() {
        return Ok(RawOutput {
            cancelled: true,
            ..RawOutput::default()
        });
    }

    let command_line = spec.command_line();
    debug!(
        command = %command_line,
        dir = %spec.working_dir().display(),
        "launching build"
    );

    let mut cmd = spec.to_command();
    isolate_process_group(&mut cmd);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            info!(command = %command_line, error = %e, "failed to launch checking");
            return Err(CheckError::Launch {
                command: command_line,
                source: e,
            });
        }
    };

    let start = Instant::now();

    // Drain the pipes while waiting. A child blocked on a full pipe would
    // never exit.
    let stdout_rx = spawn_reader(child.stdout.take());
    let stderr_rx = spawn_reader(child.stderr.take());

    let mut cancelled = false;
    let status = loop {
        match child.wait_timeout(options.poll_interval) {
            Ok(Some(status)) => break Some(status),
            Ok(None) => {
                if cancel.is_cancelled() {
                    debug!(command = %command_line, "cancelling build");
                    terminate_child(&mut child, options.termination_grace);
                    cancelled = true;
                    break None;
                }
            }
            Err(e) => {
                warn!(command = %command_line, error = %e, "failed to wait for build");
                terminate_child(&mut child, options.termination_grace);
                return Err(CheckError::Launch {
                    command: command_line,
                    source: e,
                });
            }
        }
    };

    let drain_deadline = Instant::now() + OUTPUT_DRAIN_TIMEOUT;
    let stdout = collect(stdout_rx, drain_deadline);
    let stderr = collect(stderr_rx, drain_deadline);

    debug!(
        command = %command_line,
        exit_code = ?status.and_then(|s| s.code()),
        cancelled,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "build finished"
    );

    Ok(RawOutput {
        exit_code: status.and_then(|s| s.code()),
        stdout,
        stderr,
        cancelled,
    })
}

/// Forward the stream in chunks as it is read, so whatever arrived before a
/// drain timeout is kept.
fn spawn_reader<R: Read + Send + 'static>(stream: Option<R>) -> mpsc::Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    if let Some(mut stream) = stream {
        thread::spawn(move || {
            let mut buf = [0u8; READ_CHUNK_SIZE];
            loop {
                match stream.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(_) => break,
                }
            }
        });
    }
    rx
}

/// Gather chunks until the writer side closes or `deadline` passes.
///
/// No size limit: assertion diffs from the test framework can be large.
fn collect(rx: mpsc::Receiver<Vec<u8>>, deadline: Instant) -> String {
    let mut bytes = Vec::new();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(chunk) => bytes.extend_from_slice(&chunk),
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                debug!(
                    collected = bytes.len(),
                    "output pipe still open after build exit, keeping what arrived"
                );
                break;
            }
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
