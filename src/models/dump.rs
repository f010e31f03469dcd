//! Crash-dump artifact models.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One crash-dump file discovered in the storage directory.
///
/// Artifacts are discovered fresh on every listing or resolution call;
/// nothing is cached between requests. They are produced externally by the
/// crashing process and never created by this subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpArtifact {
    /// File name, unique within the storage directory (includes extension).
    pub name: String,
    /// Absolute location on disk.
    pub path: PathBuf,
    /// Last-modified time of the file.
    pub modified: DateTime<Utc>,
}

/// Serializable listing entry handed to external callers.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DumpInfo {
    /// Artifact file name.
    pub name: String,
    /// Last-modified time of the underlying file.
    pub timestamp: DateTime<Utc>,
    /// Link to this artifact's metadata.
    pub self_link: String,
    /// Link that triggers analysis of this artifact.
    pub analyze_link: String,
}

impl DumpInfo {
    /// Build the caller-facing view of an artifact under `base_url`.
    #[must_use]
    pub fn from_artifact(artifact: &DumpArtifact, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            name: artifact.name.clone(),
            timestamp: artifact.modified,
            self_link: format!("{base}/{}", artifact.name),
            analyze_link: format!("{base}/{}/analyze", artifact.name),
        }
    }
}
