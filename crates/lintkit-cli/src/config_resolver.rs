//! Locating and loading `lintkit.toml`.
//!
//! Lookup order:
//!
//! 1. `--config <path>`
//! 2. `lintkit.toml`, then `.lintkit.toml`, in the analyzed directory
//! 3. `config.toml` in `$LINTKIT_CONFIG_DIR`, or in `~/.lintkit/`
//! 4. built-in defaults

use lintkit_core::{Config, ConfigError};
use std::path::{Path, PathBuf};

/// Overrides the global config directory.
pub const CONFIG_DIR_ENV_VAR: &str = "LINTKIT_CONFIG_DIR";

const PROJECT_CONFIG_NAMES: &[&str] = &["lintkit.toml", ".lintkit.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found next to the analyzed sources.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Reads the configuration this source points at.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid. An
    /// explicit path that does not exist is an error too.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let Some(path) = self.path() else {
            tracing::debug!("No config file found, using defaults");
            return Ok(Config::default());
        };

        if matches!(self, Self::Global(_)) {
            tracing::info!("Using global config: {}", path.display());
        } else {
            tracing::debug!("Using config: {}", path.display());
        }
        Config::from_file(path)
    }
}

/// Resolves the configuration for `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_in(project_dir, explicit, global_config_dir().as_deref())
}

/// Resolution with the global directory passed in, so tests need no env vars.
fn resolve_in(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<&Path>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, ConfigSource::Global)
}

/// Returns `$LINTKIT_CONFIG_DIR`, falling back to `~/.lintkit`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    std::env::var_os(CONFIG_DIR_ENV_VAR)
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".lintkit")))
}
