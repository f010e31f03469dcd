//! Per-request analysis orchestration.
//!
//! A request moves through `Resolving -> Launching -> Running` and ends in
//! one of `{Completed, TimedOut, LaunchFailed, Cancelled}`. Only a missing
//! artifact or an infrastructure fault surfaces as `Err`; "the analyzer
//! ran and failed" and "the analyzer would not start" are both ordinary
//! [`AnalysisReport`] values the caller is expected to display.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, Instrument};

use crate::config::GlobalConfig;
use crate::dumps::DumpDirectory;
use crate::models::analysis::{AnalysisReport, AnalysisRequest, AnalysisStatus};
use crate::models::dump::DumpArtifact;
use crate::runner::{CommandOutcome, Executable, ExitKind};
use crate::{AppError, Result};

/// Orchestrates analysis of named dump artifacts.
#[derive(Debug, Clone)]
pub struct Analyzer {
    directory: DumpDirectory,
    analyzer_path: PathBuf,
    working_dir: PathBuf,
    idle_timeout: Duration,
    hard_ceiling: Option<Duration>,
    directive: String,
}

impl Analyzer {
    /// Build an orchestrator over `directory` from the loaded configuration.
    ///
    /// The analyzer tool path arrives resolved by the environment-discovery
    /// collaborator; no path probing happens here.
    #[must_use]
    pub fn new(directory: DumpDirectory, config: &GlobalConfig) -> Self {
        Self {
            directory,
            analyzer_path: config.analyzer_path.clone(),
            working_dir: config.working_dir().to_path_buf(),
            idle_timeout: config.idle_timeout(),
            hard_ceiling: config.hard_ceiling(),
            directive: config.analysis.directive.clone(),
        }
    }

    /// Analyze the named dump and report the outcome.
    ///
    /// Suspends while the external analyzer runs; concurrent calls for
    /// different artifacts are fully independent.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no such artifact exists (nothing is
    /// launched in that case), `AppError::Io` for infrastructure faults.
    /// Timeouts, launch failures, and nonzero analyzer exits are reported
    /// inside the `Ok` payload.
    pub async fn analyze(&self, name: &str, cancel: &CancellationToken) -> Result<AnalysisReport> {
        let span = info_span!("analyze_dump", name);
        async {
            let artifact = self.directory.resolve(name).await?;
            let request = self.request_for(&artifact);

            let exe = Executable::new(
                &request.analyzer_path,
                &request.working_dir,
                request.idle_timeout,
                request.hard_ceiling,
            );

            let report = match exe.run(build_args(&self.directive, &request), cancel).await {
                Ok(outcome) => report_from_outcome(outcome),
                Err(AppError::Launch(msg)) => AnalysisReport {
                    succeeded: false,
                    status: AnalysisStatus::LaunchFailed,
                    output: String::new(),
                    error: msg,
                    elapsed_ms: 0,
                },
                Err(other) => return Err(other),
            };

            info!(
                succeeded = report.succeeded,
                status = ?report.status,
                elapsed_ms = report.elapsed_ms,
                "analysis finished"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }

    fn request_for(&self, artifact: &DumpArtifact) -> AnalysisRequest {
        AnalysisRequest {
            dump_path: artifact.path.clone(),
            analyzer_path: self.analyzer_path.clone(),
            working_dir: self.working_dir.clone(),
            idle_timeout: self.idle_timeout,
            hard_ceiling: self.hard_ceiling,
        }
    }
}

/// Debugger command line: run the analysis directive, then open the dump
/// as the crash target.
fn build_args(directive: &str, request: &AnalysisRequest) -> Vec<OsString> {
    vec![
        OsString::from("-c"),
        OsString::from(directive),
        OsString::from("-z"),
        request.dump_path.clone().into_os_string(),
    ]
}

fn report_from_outcome(outcome: CommandOutcome) -> AnalysisReport {
    let status = match outcome.kind {
        ExitKind::Exited(_) | ExitKind::Killed => AnalysisStatus::Completed,
        ExitKind::TimedOut => AnalysisStatus::TimedOut,
        ExitKind::Cancelled => AnalysisStatus::Cancelled,
    };
    AnalysisReport {
        succeeded: outcome.kind.is_success(),
        status,
        output: outcome.stdout,
        error: outcome.stderr,
        elapsed_ms: u64::try_from(outcome.elapsed.as_millis()).unwrap_or(u64::MAX),
    }
}
