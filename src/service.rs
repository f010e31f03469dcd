//! Transport-agnostic service façade.
//!
//! The four operations exposed to external collaborators. The HTTP layer,
//! authentication, and analyzer-path discovery all live outside this
//! crate's core; callers hand in a base URL for link construction and a
//! cancellation token tied to their own request lifecycle.

use tokio_util::sync::CancellationToken;
use tracing::{info_span, Instrument};

use crate::analysis::Analyzer;
use crate::config::GlobalConfig;
use crate::dumps::DumpDirectory;
use crate::models::analysis::AnalysisReport;
use crate::models::dump::DumpInfo;
use crate::Result;

/// Dump management and analysis service.
#[derive(Debug, Clone)]
pub struct DumpService {
    directory: DumpDirectory,
    analyzer: Analyzer,
}

impl DumpService {
    /// Assemble the service from loaded configuration.
    #[must_use]
    pub fn new(config: &GlobalConfig) -> Self {
        let directory = DumpDirectory::new(config.dumps_dir.clone());
        let analyzer = Analyzer::new(directory.clone(), config);
        Self {
            directory,
            analyzer,
        }
    }

    /// List every dump artifact with metadata and navigation links.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the storage directory cannot be read.
    pub async fn list_dumps(&self, base_url: &str) -> Result<Vec<DumpInfo>> {
        let span = info_span!("list_dumps");
        async {
            let artifacts = self.directory.list().await?;
            Ok(artifacts
                .iter()
                .map(|artifact| DumpInfo::from_artifact(artifact, base_url))
                .collect())
        }
        .instrument(span)
        .await
    }

    /// Fetch metadata for one named dump.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no such artifact exists.
    pub async fn get_dump(&self, name: &str, base_url: &str) -> Result<DumpInfo> {
        let span = info_span!("get_dump", name);
        async {
            let artifact = self.directory.resolve(name).await?;
            Ok(DumpInfo::from_artifact(&artifact, base_url))
        }
        .instrument(span)
        .await
    }

    /// Delete one named dump from disk.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if absent, `AppError::Io` if the file
    /// cannot be removed.
    pub async fn delete_dump(&self, name: &str) -> Result<()> {
        let span = info_span!("delete_dump", name);
        self.directory.delete(name).instrument(span).await
    }

    /// Run the external analyzer against one named dump.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no such artifact exists; analysis
    /// failures are carried inside the report.
    pub async fn analyze_dump(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport> {
        self.analyzer.analyze(name, cancel).await
    }
}
