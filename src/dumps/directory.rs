//! Dump storage directory operations.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::dumps::name_safety::{validate_dump_name, DUMP_EXTENSION};
use crate::models::dump::DumpArtifact;
use crate::{AppError, Result};

/// Handle on the configured dump storage directory.
///
/// Stateless between calls: every operation goes to the filesystem, so a
/// dump written or removed by other tooling is visible immediately.
#[derive(Debug, Clone)]
pub struct DumpDirectory {
    root: PathBuf,
}

impl DumpDirectory {
    /// Create a handle rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The configured storage directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate all `.dmp` artifacts in the storage directory.
    ///
    /// Order follows filesystem enumeration and is not guaranteed. A
    /// missing directory yields an empty list (nothing has crashed yet);
    /// any other failure propagates.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the directory exists but cannot be read.
    pub async fn list(&self) -> Result<Vec<DumpArtifact>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(root = %self.root.display(), "dump directory absent, listing empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(AppError::Io(format!("cannot read dump directory: {err}"))),
        };

        let mut dumps = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| AppError::Io(format!("cannot read dump directory entry: {err}")))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(DUMP_EXTENSION) {
                continue;
            }
            match artifact_from_path(&path).await {
                Ok(artifact) => dumps.push(artifact),
                Err(err) => {
                    // Entry vanished or turned unreadable mid-listing.
                    warn!(path = %path.display(), %err, "skipping unreadable dump entry");
                }
            }
        }

        debug!(count = dumps.len(), "listed dump artifacts");
        Ok(dumps)
    }

    /// Resolve a named artifact to its on-disk location.
    ///
    /// Name validation happens before any filesystem access; traversal
    /// attempts and absent files are both `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the name is invalid or no such file
    /// exists, `AppError::Io` if its metadata cannot be read.
    pub async fn resolve(&self, name: &str) -> Result<DumpArtifact> {
        validate_dump_name(name)?;

        let path = self.root.join(name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {
                let modified = modified_time(&path, &meta)?;
                Ok(DumpArtifact {
                    name: name.to_owned(),
                    path,
                    modified,
                })
            }
            Ok(_) => Err(AppError::NotFound(format!("dump artifact {name:?}"))),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("dump artifact {name:?}")))
            }
            Err(err) => Err(AppError::Io(format!("cannot stat dump {name:?}: {err}"))),
        }
    }

    /// Remove a named artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the artifact is already absent,
    /// `AppError::Io` for permission or file-in-use failures (dump files
    /// may be held open by other tooling).
    pub async fn delete(&self, name: &str) -> Result<()> {
        let artifact = self.resolve(name).await?;
        tokio::fs::remove_file(&artifact.path)
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => AppError::NotFound(format!("dump artifact {name:?}")),
                _ => AppError::Io(format!("cannot delete dump {name:?}: {err}")),
            })?;
        info!(name, "dump artifact deleted");
        Ok(())
    }
}

async fn artifact_from_path(path: &Path) -> Result<DumpArtifact> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::Io(format!("non-UTF-8 dump file name: {}", path.display())))?
        .to_owned();
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|err| AppError::Io(format!("cannot stat {}: {err}", path.display())))?;
    let modified = modified_time(path, &meta)?;
    Ok(DumpArtifact {
        name,
        path: path.to_path_buf(),
        modified,
    })
}

fn modified_time(path: &Path, meta: &std::fs::Metadata) -> Result<DateTime<Utc>> {
    let modified = meta
        .modified()
        .map_err(|err| AppError::Io(format!("cannot read mtime of {}: {err}", path.display())))?;
    Ok(DateTime::<Utc>::from(modified))
}
