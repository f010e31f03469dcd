//! Global configuration parsing and validation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{AppError, Result};

/// Analysis invocation settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AnalysisConfig {
    /// Maximum allowed silence from the analyzer before forced termination.
    #[serde(default = "default_idle_timeout_seconds")]
    pub idle_timeout_seconds: u64,
    /// Total wall-clock ceiling for one analysis; 0 disables the ceiling.
    #[serde(default)]
    pub hard_timeout_seconds: u64,
    /// Debugger command string passed via `-c`.
    #[serde(default = "default_directive")]
    pub directive: String,
    /// Working directory for the analyzer process; defaults to `dumps_dir`.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

fn default_idle_timeout_seconds() -> u64 {
    120
}

fn default_directive() -> String {
    "!analyze -v;q".into()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            idle_timeout_seconds: default_idle_timeout_seconds(),
            hard_timeout_seconds: 0,
            directive: default_directive(),
            working_dir: None,
        }
    }
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Directory where the crashing process writes `.dmp` artifacts.
    pub dumps_dir: PathBuf,
    /// Path to the external analyzer executable.
    pub analyzer_path: PathBuf,
    /// Analysis invocation settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string and normalize paths.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Idle timeout as a [`Duration`].
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis.idle_timeout_seconds)
    }

    /// Hard wall-clock ceiling, if one is configured.
    #[must_use]
    pub fn hard_ceiling(&self) -> Option<Duration> {
        match self.analysis.hard_timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Working directory for analyzer invocations.
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        self.analysis
            .working_dir
            .as_deref()
            .unwrap_or(&self.dumps_dir)
    }

    fn validate(&mut self) -> Result<()> {
        if self.analysis.idle_timeout_seconds == 0 {
            return Err(AppError::Config(
                "analysis.idle_timeout_seconds must be greater than zero".into(),
            ));
        }

        if self.analysis.directive.trim().is_empty() {
            return Err(AppError::Config(
                "analysis.directive must not be empty".into(),
            ));
        }

        // The dumps directory may not exist yet (nothing has crashed), so it
        // is canonicalized only when present. The analyzer path is resolved
        // lazily at spawn time by the runner.
        if self.dumps_dir.exists() {
            let canonical = self
                .dumps_dir
                .canonicalize()
                .map_err(|err| AppError::Config(format!("dumps_dir invalid: {err}")))?;
            self.dumps_dir = canonical;
        }

        Ok(())
    }
}
