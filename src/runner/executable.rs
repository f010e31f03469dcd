//! Idle-timeout-bounded external command execution.
//!
//! Spawns a child with both output streams piped, drains stdout and stderr
//! on independent tasks (a full OS pipe buffer must never block the child),
//! and supervises the run against an idle deadline that advances whenever
//! either stream produces data. The contract is "still making progress",
//! not a total wall-clock limit; an optional hard ceiling caps a child
//! that trickles output forever.
//!
//! Every exit path (normal completion, idle timeout, hard ceiling,
//! external cancellation) kills the whole process group and reaps the
//! child, so no orphans survive the call. `kill_on_drop(true)` backstops
//! task aborts.

use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::{AppError, Result};

/// How the supervised child run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    /// Child exited on its own with this code.
    Exited(i32),
    /// Child was terminated by a signal outside our control.
    Killed,
    /// We terminated the child after the idle window (or hard ceiling) passed.
    TimedOut,
    /// We terminated the child because the caller abandoned the request.
    Cancelled,
}

impl ExitKind {
    /// True only for a natural exit with code 0.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Exited(0))
    }
}

/// Captured result of one supervised command run.
///
/// Both buffers are complete up to the moment of termination, whatever the
/// exit kind; partial diagnostic output is never dropped.
#[derive(Debug)]
pub struct CommandOutcome {
    /// How the run ended.
    pub kind: ExitKind,
    /// Wall-clock time from spawn to termination.
    pub elapsed: Duration,
    /// Everything the child wrote to stdout.
    pub stdout: String,
    /// Everything the child wrote to stderr.
    pub stderr: String,
}

/// An external executable bound to a working directory and timeout policy.
#[derive(Debug, Clone)]
pub struct Executable {
    path: PathBuf,
    working_dir: PathBuf,
    idle_timeout: Duration,
    hard_ceiling: Option<Duration>,
}

impl Executable {
    /// Describe an executable to supervise. Nothing is launched yet.
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
        idle_timeout: Duration,
        hard_ceiling: Option<Duration>,
    ) -> Self {
        Self {
            path: path.into(),
            working_dir: working_dir.into(),
            idle_timeout,
            hard_ceiling,
        }
    }

    /// Run the executable with `args`, capturing both streams in full.
    ///
    /// Suspends until the child exits, times out, or `cancel` fires; other
    /// work on the caller's runtime proceeds normally in the meantime.
    /// Nonzero exits and timeouts are ordinary [`CommandOutcome`] values,
    /// not errors.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Launch` if the executable is missing or cannot
    /// be spawned (no child was created), `AppError::Io` if waiting on a
    /// launched child fails.
    pub async fn run<I, S>(&self, args: I, cancel: &CancellationToken) -> Result<CommandOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let span = info_span!("run_executable", path = %self.path.display());
        async {
            let start = Instant::now();
            let mut child = self.spawn(args)?;
            let pid = child.id().unwrap_or(0);
            debug!(pid, "child process spawned");

            // Milliseconds since `start` of the most recent stream activity,
            // bumped by both drain tasks.
            let last_activity = Arc::new(AtomicU64::new(0));

            let stdout_task = child
                .stdout
                .take()
                .map(|pipe| drain_stream(pipe, Arc::clone(&last_activity), start));
            let stderr_task = child
                .stderr
                .take()
                .map(|pipe| drain_stream(pipe, Arc::clone(&last_activity), start));

            let kind = self
                .supervise(&mut child, &last_activity, start, cancel)
                .await?;

            let stdout = collect_buffer(stdout_task).await;
            let stderr = collect_buffer(stderr_task).await;
            let elapsed = start.elapsed();

            let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
            info!(pid, ?kind, elapsed_ms, "child run finished");
            Ok(CommandOutcome {
                kind,
                elapsed,
                stdout,
                stderr,
            })
        }
        .instrument(span)
        .await
    }

    fn spawn<I, S>(&self, args: I) -> Result<Child>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.path);
        cmd.args(args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group so a timeout kill reaches the child's
        // descendants, not just the direct child.
        #[cfg(unix)]
        cmd.process_group(0);

        cmd.spawn().map_err(|err| match err.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => AppError::Launch(format!(
                "cannot launch {}: {err}",
                self.path.display()
            )),
            _ => AppError::Io(format!("spawn of {} failed: {err}", self.path.display())),
        })
    }

    /// Wait for the child against the idle deadline, hard ceiling, and
    /// cancellation. Returns how the run ended; the child is dead and
    /// reaped on return.
    async fn supervise(
        &self,
        child: &mut Child,
        last_activity: &AtomicU64,
        start: Instant,
        cancel: &CancellationToken,
    ) -> Result<ExitKind> {
        let hard_deadline = self.hard_ceiling.map(|ceiling| start + ceiling);

        loop {
            let last_ms = last_activity.load(Ordering::Relaxed);
            let idle_deadline = start + Duration::from_millis(last_ms) + self.idle_timeout;

            let hard_sleep = async {
                match hard_deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                status = child.wait() => {
                    let status = status
                        .map_err(|err| AppError::Io(format!("wait on child failed: {err}")))?;
                    return Ok(status.code().map_or(ExitKind::Killed, ExitKind::Exited));
                }

                () = cancel.cancelled() => {
                    info!("caller cancelled, terminating child");
                    kill_process_tree(child).await;
                    return Ok(ExitKind::Cancelled);
                }

                () = tokio::time::sleep_until(idle_deadline) => {
                    // Activity may have arrived while we slept; only a
                    // still-stale instant means real silence.
                    if last_activity.load(Ordering::Relaxed) == last_ms {
                        warn!(
                            idle_secs = self.idle_timeout.as_secs(),
                            "no output within idle window, terminating child"
                        );
                        kill_process_tree(child).await;
                        return Ok(ExitKind::TimedOut);
                    }
                }

                () = hard_sleep => {
                    warn!("hard wall-clock ceiling reached, terminating child");
                    kill_process_tree(child).await;
                    return Ok(ExitKind::TimedOut);
                }
            }
        }
    }
}

/// Drain one output stream to an owned buffer, bumping the shared
/// activity instant on every read.
fn drain_stream<R>(
    mut stream: R,
    last_activity: Arc<AtomicU64>,
    start: Instant,
) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 8192];
        loop {
            match stream.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => {
                    buffer.extend_from_slice(&chunk[..n]);
                    let elapsed_ms =
                        u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    last_activity.store(elapsed_ms, Ordering::Relaxed);
                }
                Err(err) => {
                    // Pipe torn down by a kill; keep what we have.
                    debug!(%err, "stream read ended");
                    break;
                }
            }
        }
        buffer
    })
}

/// Await a drain task and render its buffer, tolerating a missing pipe.
async fn collect_buffer(task: Option<JoinHandle<Vec<u8>>>) -> String {
    match task {
        Some(handle) => match handle.await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                warn!(%err, "stream drain task failed");
                String::new()
            }
        },
        None => String::new(),
    }
}

/// Forcibly terminate the child and its descendants, then reap it.
async fn kill_process_tree(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        if let Ok(raw) = i32::try_from(pid) {
            // The child leads its own process group (see `spawn`), so the
            // group kill takes out any analyzer helpers it forked.
            let _ = nix::sys::signal::killpg(
                nix::unistd::Pid::from_raw(raw),
                nix::sys::signal::Signal::SIGKILL,
            );
        }
    }

    // Direct kill doubles as the non-Unix path and reaps the child.
    if let Err(err) = child.kill().await {
        debug!(%err, "child already gone during kill");
    }
}
