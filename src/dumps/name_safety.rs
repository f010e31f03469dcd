//! Artifact-name validation and traversal rejection.
//!
//! Dump names arrive from external callers and are joined directly under
//! the storage directory, so every lookup must stay inside that boundary.
//! Rejections are reported as `NotFound` rather than a distinct violation
//! kind: a traversal probe must not learn whether a file exists outside
//! the configured directory.

use std::path::{Component, Path};

use crate::{AppError, Result};

/// File extension carried by every dump artifact.
pub const DUMP_EXTENSION: &str = "dmp";

/// Validate that `name` is a plain `.dmp` file name with no path structure.
///
/// Accepts a single normal path component carrying the dump extension.
/// Separators, `..` segments, absolute prefixes, NUL bytes, and empty
/// names are all rejected.
///
/// # Errors
///
/// Returns `AppError::NotFound` for any name that fails validation.
pub fn validate_dump_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('\0') {
        return Err(not_found(name));
    }

    // Both separators are rejected regardless of platform; dump names are
    // caller input and `\` is a separator on the platform that produced
    // the original dumps.
    if name.contains('/') || name.contains('\\') {
        return Err(not_found(name));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => {}
        _ => return Err(not_found(name)),
    }

    if Path::new(name).extension().and_then(|ext| ext.to_str()) != Some(DUMP_EXTENSION) {
        return Err(not_found(name));
    }

    Ok(())
}

fn not_found(name: &str) -> AppError {
    AppError::NotFound(format!("dump artifact {name:?}"))
}
