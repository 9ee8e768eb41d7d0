//! Configuration types for lintkit.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::flags::CheckLevel;
use crate::request::FixitRequest;

/// Top-level configuration, usually read from `lintkit.toml`.
///
/// ```toml
/// level = 1
/// checks = ["no-unwrap-expect", "require-tracing"]
/// fixit = "fix-log-to-tracing"
///
/// [analyzer]
/// exclude = ["**/generated/**"]
///
/// [check.no-unwrap-expect]
/// severity = "warning"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Level used to pick checks when no explicit list is given.
    #[serde(default)]
    pub level: Option<u8>,

    /// Explicit list of checks to run.
    #[serde(default)]
    pub checks: Option<Vec<String>>,

    /// Fixit request: a fixit name or `all_fixits`.
    #[serde(default)]
    pub fixit: Option<String>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Per-check overrides, keyed by check name.
    #[serde(default, rename = "check")]
    pub overrides: HashMap<String, CheckConfig>,
}

impl Config {
    /// Creates a default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or `level` is out of range.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;

        if let Some(level) = config.level {
            if CheckLevel::from_number(level).is_none() {
                return Err(ConfigError::InvalidLevel { level });
            }
        }

        Ok(config)
    }

    /// Returns the configured level, if any.
    #[must_use]
    pub fn check_level(&self) -> Option<CheckLevel> {
        self.level.and_then(CheckLevel::from_number)
    }

    /// Returns the configured fixit request.
    #[must_use]
    pub fn fixit_request(&self) -> FixitRequest {
        FixitRequest::parse(self.fixit.as_deref())
    }

    /// Checks if a check is enabled.
    #[must_use]
    pub fn is_check_enabled(&self, check_name: &str) -> bool {
        self.overrides
            .get(check_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a check.
    #[must_use]
    pub fn check_severity(&self, check_name: &str) -> Option<crate::Severity> {
        self.overrides.get(check_name).and_then(|c| c.severity)
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: vec!["**/target/**".to_string(), "**/vendor/**".to_string()],
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

/// Per-check configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Whether this check runs when activated.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this check.
    #[serde(default)]
    pub severity: Option<crate::Severity>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// `level` outside 0..=3.
    #[error("Invalid check level {level}, expected 0 to 3")]
    InvalidLevel {
        /// The rejected value.
        level: u8,
    },
}
