//! The per-run fixit request.

use std::fmt;

/// Environment variable holding the fixit request.
pub const FIXIT_ENV_VAR: &str = "LINTKIT_FIXIT";

/// Sentinel value enabling every fixit of every check that defines one.
pub const ALL_FIXITS: &str = "all_fixits";

/// Which fixits a run asked for.
///
/// Read once from outside the core (environment, flag or config file)
/// and handed to the [`CheckManager`](crate::CheckManager) as a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FixitRequest {
    /// Fixits are off for this run.
    #[default]
    Disabled,
    /// Every fixit is on.
    All,
    /// Only the named fixit is on.
    Named(String),
}

impl FixitRequest {
    /// Interprets a raw request value.
    ///
    /// `None` and the empty string disable fixits, [`ALL_FIXITS`] enables
    /// all of them, anything else names a single fixit. Unknown names are
    /// not rejected here.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None | Some("") => Self::Disabled,
            Some(ALL_FIXITS) => Self::All,
            Some(name) => Self::Named(name.to_string()),
        }
    }

    /// Reads the request from [`FIXIT_ENV_VAR`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::parse(std::env::var(FIXIT_ENV_VAR).ok().as_deref())
    }

    /// Returns the single requested fixit name, if any.
    #[must_use]
    pub fn requested_name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Disabled | Self::All => None,
        }
    }

    /// Returns `true` unless fixits are disabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Returns `true` for the all-fixits sentinel.
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for FixitRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::All => write!(f, "{ALL_FIXITS}"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}
