//! Shared fixtures for process-spawning integration tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use dumpdock::config::GlobalConfig;

/// Write an executable `/bin/sh` script into `dir` and return its path.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod script");
    path
}

/// Drop a fake dump artifact into `dir`.
pub fn write_dump(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"MDMP fake dump bytes").expect("write dump");
    path
}

/// Build a validated config pointing at `dumps_dir` and `analyzer`, with a
/// one-second idle window to keep timeout tests fast.
pub fn test_config(dumps_dir: &Path, analyzer: &Path) -> GlobalConfig {
    let raw = format!(
        "dumps_dir = {:?}\nanalyzer_path = {:?}\n\n[analysis]\nidle_timeout_seconds = 1\n",
        dumps_dir.to_string_lossy(),
        analyzer.to_string_lossy(),
    );
    GlobalConfig::from_toml_str(&raw).expect("test config")
}
