//! Registration surface and per-run activation of checks.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::check::{CheckBox, FixitId};
use crate::fixits::{FixitIndex, RegisteredFixit};
use crate::flags::{CheckFlags, CheckLevel};
use crate::registry::{CheckRegistry, RegistryError};
use crate::request::FixitRequest;

/// Outcome of one [`CheckManager::create_checkers`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivationReport {
    /// Names of the created checks, in creation order.
    pub created: Vec<String>,
    /// Requested names that matched no registered check.
    pub unknown_checks: Vec<String>,
    /// The requested fixit name, when no check owns it.
    pub unknown_fixit: Option<String>,
    /// Owner of the requested fixit, when it was created without being
    /// requested.
    pub implicit_check: Option<String>,
}

impl ActivationReport {
    /// Returns `true` if every requested name resolved.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unknown_checks.is_empty() && self.unknown_fixit.is_none()
    }
}

/// Owns the check registry, the fixit index and the current run's checks.
///
/// Registration happens once at start-up. Each [`create_checkers`] call
/// then rebuilds the set of live instances from scratch; instances from
/// the previous call are dropped.
///
/// [`create_checkers`]: CheckManager::create_checkers
#[derive(Debug, Default)]
pub struct CheckManager {
    registry: CheckRegistry,
    fixits: FixitIndex,
    fixit_request: FixitRequest,
    created: Vec<CheckBox>,
}

impl CheckManager {
    /// Creates a manager with fixits disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fixit request for subsequent activations.
    #[must_use]
    pub fn with_fixit_request(mut self, request: FixitRequest) -> Self {
        self.fixit_request = request;
        self
    }

    /// Replaces the fixit request for subsequent activations.
    pub fn set_fixit_request(&mut self, request: FixitRequest) {
        self.fixit_request = request;
    }

    /// Returns the current fixit request.
    #[must_use]
    pub fn fixit_request(&self) -> &FixitRequest {
        &self.fixit_request
    }

    /// Registers a check. See [`CheckRegistry::register`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::EmptyCheckName`] if `name` is empty.
    pub fn register_check<F>(
        &mut self,
        name: impl Into<String>,
        flags: CheckFlags,
        factory: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn() -> CheckBox + Send + Sync + 'static,
    {
        self.registry.register(name, flags, factory)
    }

    /// Registers a fixit. See [`FixitIndex::register_fixit`].
    ///
    /// # Errors
    ///
    /// Returns an error on empty or duplicate names.
    pub fn register_fixit(
        &mut self,
        id: FixitId,
        fixit_name: &str,
        check_name: &str,
    ) -> Result<(), RegistryError> {
        self.fixits.register_fixit(id, fixit_name, check_name)
    }

    /// Returns the check registry.
    #[must_use]
    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// Creates a standalone instance of the check registered under `name`.
    #[must_use]
    pub fn create_check(&self, name: &str) -> Option<CheckBox> {
        self.registry.create_check(name)
    }

    /// Returns the name of the check owning `fixit_name`.
    ///
    /// Checks are scanned in registration order; the first owner wins.
    #[must_use]
    pub fn check_name_for_fixit(&self, fixit_name: &str) -> Option<&str> {
        self.fixits.check_name_for_fixit(
            self.registry.iter().map(crate::registry::RegisteredCheck::name),
            fixit_name,
        )
    }

    /// Returns registered check names in registration order.
    #[must_use]
    pub fn available_check_names(&self, include_hidden: bool) -> Vec<&str> {
        self.registry.available_check_names(include_hidden)
    }

    /// Returns the non-hidden check names at or below `level`.
    #[must_use]
    pub fn checks_for_level(&self, level: CheckLevel) -> Vec<&str> {
        self.registry.names_up_to_level(level)
    }

    /// Returns the fixits of `check_name` in registration order.
    #[must_use]
    pub fn available_fixits(&self, check_name: &str) -> &[RegisteredFixit] {
        self.fixits.available_fixits(check_name)
    }

    /// Builds this run's check instances.
    ///
    /// Every requested name is created in order; unknown names are logged
    /// and skipped. If a single fixit was requested it is enabled on its
    /// owning check, and that check is appended when it was not requested.
    /// With the all-fixits sentinel every created check gets all of its
    /// own fixits.
    pub fn create_checkers<S: AsRef<str>>(&mut self, requested: &[S]) -> ActivationReport {
        let mut report = ActivationReport::default();

        let mut fixit_owner: Option<String> = None;
        let mut fixit_id = FixitId::NONE;
        if let Some(fixit_name) = self.fixit_request.requested_name() {
            match (
                self.check_name_for_fixit(fixit_name),
                self.fixits.fixit(fixit_name),
            ) {
                (Some(owner), Some(fixit)) => {
                    fixit_owner = Some(owner.to_string());
                    fixit_id = fixit.id;
                }
                _ => {
                    warn!("Unknown fixit name {fixit_name}, no fixit will be applied");
                    report.unknown_fixit = Some(fixit_name.to_string());
                }
            }
        }

        self.created.clear();
        self.created.reserve(requested.len() + 1);

        for name in requested {
            let name = name.as_ref();
            let Some(mut check) = self.registry.create_check(name) else {
                report.unknown_checks.push(name.to_string());
                continue;
            };

            if fixit_owner.as_deref() == Some(name) {
                check.set_enabled_fixits(fixit_id);
            } else if self.fixit_request.is_all() {
                check.set_enabled_fixits(self.fixits.combined_ids(name));
            }

            report.created.push(name.to_string());
            self.created.push(check);
        }

        if let Some(owner) = fixit_owner {
            let already_requested = requested.iter().any(|name| name.as_ref() == owner);
            if !already_requested {
                if let Some(mut check) = self.registry.create_check(&owner) {
                    debug!("Enabling {owner} implicitly for fixit {}", self.fixit_request);
                    check.set_enabled_fixits(fixit_id);
                    self.created.push(check);
                    report.created.push(owner.clone());
                    report.implicit_check = Some(owner);
                }
            }
        }

        info!(
            "Created {} check(s), fixits {}",
            self.created.len(),
            self.fixit_request
        );

        report
    }

    /// Returns the instances built by the last [`create_checkers`] call.
    ///
    /// [`create_checkers`]: CheckManager::create_checkers
    #[must_use]
    pub fn created_checks(&self) -> &[CheckBox] {
        &self.created
    }

    /// Returns `true` if a fixit name or the all-fixits sentinel was
    /// requested.
    #[must_use]
    pub fn fixits_enabled(&self) -> bool {
        self.fixit_request.is_enabled()
    }

    /// Returns `true` only for the all-fixits sentinel.
    #[must_use]
    pub fn all_fixits_enabled(&self) -> bool {
        self.fixit_request.is_all()
    }
}
