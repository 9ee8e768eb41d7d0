//! Ordered table of known checks.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::check::CheckBox;
use crate::flags::{CheckFlags, CheckLevel};

/// Zero-argument factory producing a fresh check instance.
pub type CheckFactory = Box<dyn Fn() -> CheckBox + Send + Sync>;

/// Errors raised by check and fixit registration.
///
/// Registration happens from author-controlled code at start-up, so these
/// indicate a programming mistake rather than bad user input.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RegistryError {
    /// A check or fixit was registered with an empty check name.
    #[error("check name must not be empty")]
    #[diagnostic(code(lintkit::registry::empty_check_name))]
    EmptyCheckName,

    /// A fixit was registered with an empty name.
    #[error("fixit name must not be empty")]
    #[diagnostic(code(lintkit::registry::empty_fixit_name))]
    EmptyFixitName,

    /// The same fixit was registered twice for one check.
    #[error("fixit `{fixit}` is already registered for check `{check}`")]
    #[diagnostic(code(lintkit::registry::duplicate_fixit))]
    DuplicateFixit {
        /// Fixit name.
        fixit: String,
        /// Owning check name.
        check: String,
    },

    /// The fixit name is already owned by another check.
    #[error("fixit `{fixit}` is already owned by check `{owner}`, cannot register it for `{check}`")]
    #[diagnostic(
        code(lintkit::registry::fixit_name_taken),
        help("fixit names are global; prefix them with the check name")
    )]
    FixitNameTaken {
        /// Fixit name.
        fixit: String,
        /// Check that already owns the name.
        owner: String,
        /// Check the registration was attempted for.
        check: String,
    },
}

/// A check known to the registry.
pub struct RegisteredCheck {
    name: String,
    flags: CheckFlags,
    factory: CheckFactory,
}

impl RegisteredCheck {
    /// Returns the registered name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the registration flags.
    #[must_use]
    pub fn flags(&self) -> CheckFlags {
        self.flags
    }

    /// Builds a new instance through the factory.
    #[must_use]
    pub fn create(&self) -> CheckBox {
        (self.factory)()
    }
}

impl fmt::Debug for RegisteredCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredCheck")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// Append-only, ordered table of registered checks.
///
/// Lookups scan in registration order, so the first registration of a
/// name wins and listings are deterministic.
#[derive(Debug, Default)]
pub struct CheckRegistry {
    checks: Vec<RegisteredCheck>,
}

impl CheckRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a check.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::EmptyCheckName`] if `name` is empty.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        flags: CheckFlags,
        factory: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn() -> CheckBox + Send + Sync + 'static,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistryError::EmptyCheckName);
        }
        if self.contains(&name) {
            warn!("Check {name} registered twice, the first registration wins");
        }

        debug!("Registered check {name} ({flags:?})");
        self.checks.push(RegisteredCheck {
            name,
            flags,
            factory: Box::new(factory),
        });
        Ok(())
    }

    /// Returns the first check registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegisteredCheck> {
        self.checks.iter().find(|rc| rc.name == name)
    }

    /// Returns `true` if a check is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the flags of the check registered under `name`.
    #[must_use]
    pub fn flags(&self, name: &str) -> Option<CheckFlags> {
        self.get(name).map(RegisteredCheck::flags)
    }

    /// Creates a new instance of the check registered under `name`.
    ///
    /// An unknown name is user input, not a programming error: it is
    /// reported on the error log and `None` is returned.
    #[must_use]
    pub fn create_check(&self, name: &str) -> Option<CheckBox> {
        if let Some(rc) = self.get(name) {
            return Some(rc.create());
        }

        error!("Invalid check name {name}");
        None
    }

    /// Returns check names in registration order.
    ///
    /// Hidden checks are only listed when `include_hidden` is set.
    #[must_use]
    pub fn available_check_names(&self, include_hidden: bool) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|rc| include_hidden || !rc.flags.is_hidden())
            .map(RegisteredCheck::name)
            .collect()
    }

    /// Returns the non-hidden check names at or below `level`, in
    /// registration order.
    #[must_use]
    pub fn names_up_to_level(&self, level: CheckLevel) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|rc| !rc.flags.is_hidden() && rc.flags.level() <= level)
            .map(RegisteredCheck::name)
            .collect()
    }

    /// Iterates over registered checks in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredCheck> {
        self.checks.iter()
    }

    /// Returns the number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
