//! Analysis request and report models.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

/// Ephemeral description of one analyzer invocation.
///
/// Built per request by the orchestrator and discarded after use.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Absolute path of the dump artifact under analysis.
    pub dump_path: PathBuf,
    /// Path to the analyzer executable.
    pub analyzer_path: PathBuf,
    /// Working directory for the analyzer process.
    pub working_dir: PathBuf,
    /// Maximum allowed silence before forced termination.
    pub idle_timeout: Duration,
    /// Optional total wall-clock cap; `None` matches the legacy behavior
    /// of resetting on any output indefinitely.
    pub hard_ceiling: Option<Duration>,
}

/// Terminal state of one analysis request.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// The analyzer launched, ran, and exited on its own.
    Completed,
    /// The analyzer went silent past the idle window and was terminated.
    TimedOut,
    /// The analyzer executable could not be launched; no process existed.
    LaunchFailed,
    /// The caller abandoned the request; the analyzer was terminated.
    Cancelled,
}

/// Immutable outcome of one analysis request.
///
/// A failed analysis is an ordinary result value, not an error: the report
/// carries whatever output was captured up to the point of termination so
/// partial diagnostics are never lost.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AnalysisReport {
    /// True only when the analyzer exited with code 0.
    pub succeeded: bool,
    /// Terminal state the request reached.
    pub status: AnalysisStatus,
    /// Captured standard output, complete up to termination.
    pub output: String,
    /// Captured standard error, complete up to termination.
    pub error: String,
    /// Wall-clock time spent running the analyzer, in milliseconds.
    pub elapsed_ms: u64,
}
