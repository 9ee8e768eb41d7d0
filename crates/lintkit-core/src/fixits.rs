//! Named, check-scoped fixits.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::check::FixitId;
use crate::registry::RegistryError;

/// A fixit known to the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredFixit {
    /// Id, unique within the owning check.
    pub id: FixitId,
    /// Globally unique fixit name.
    pub name: String,
    /// Name of the owning check.
    pub check_name: String,
}

/// Fixits indexed by owning check and by name.
///
/// The per-check lists keep registration order for listings; the by-name
/// map gives direct access to a record. Nothing is ever removed.
#[derive(Debug, Default)]
pub struct FixitIndex {
    by_check: HashMap<String, Vec<RegisteredFixit>>,
    by_name: HashMap<String, RegisteredFixit>,
}

impl FixitIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers fixit `fixit_name` with `id` under `check_name`.
    ///
    /// The owning check does not need to be registered yet; owners are
    /// resolved by name at activation time.
    ///
    /// # Errors
    ///
    /// Returns an error if either name is empty, if the fixit is already
    /// registered for this check, or if another check already owns the
    /// name. A rejected registration leaves the index untouched.
    pub fn register_fixit(
        &mut self,
        id: FixitId,
        fixit_name: &str,
        check_name: &str,
    ) -> Result<(), RegistryError> {
        if fixit_name.is_empty() {
            return Err(RegistryError::EmptyFixitName);
        }
        if check_name.is_empty() {
            return Err(RegistryError::EmptyCheckName);
        }

        if let Some(existing) = self.by_name.get(fixit_name) {
            return Err(if existing.check_name == check_name {
                RegistryError::DuplicateFixit {
                    fixit: fixit_name.to_string(),
                    check: check_name.to_string(),
                }
            } else {
                RegistryError::FixitNameTaken {
                    fixit: fixit_name.to_string(),
                    owner: existing.check_name.clone(),
                    check: check_name.to_string(),
                }
            });
        }

        let fixit = RegisteredFixit {
            id,
            name: fixit_name.to_string(),
            check_name: check_name.to_string(),
        };
        debug!("Registered fixit {fixit_name} ({id}) for {check_name}");
        self.by_check
            .entry(check_name.to_string())
            .or_default()
            .push(fixit.clone());
        self.by_name.insert(fixit.name.clone(), fixit);
        Ok(())
    }

    /// Returns the fixits of `check_name` in registration order.
    #[must_use]
    pub fn available_fixits(&self, check_name: &str) -> &[RegisteredFixit] {
        self.by_check
            .get(check_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the record registered under `fixit_name`.
    #[must_use]
    pub fn fixit(&self, fixit_name: &str) -> Option<&RegisteredFixit> {
        self.by_name.get(fixit_name)
    }

    /// Returns the union of every fixit id registered for `check_name`.
    #[must_use]
    pub fn combined_ids(&self, check_name: &str) -> FixitId {
        self.available_fixits(check_name)
            .iter()
            .fold(FixitId::NONE, |acc, fixit| acc | fixit.id)
    }

    /// Finds the owner of `fixit_name` among `check_names`.
    ///
    /// Walks `check_names` in the given order and returns the first one
    /// whose fixit list contains `fixit_name`. An empty `fixit_name` never
    /// matches.
    #[must_use]
    pub fn check_name_for_fixit<'a, I>(&self, check_names: I, fixit_name: &str) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        if fixit_name.is_empty() {
            return None;
        }

        check_names.into_iter().find(|check| {
            self.available_fixits(check)
                .iter()
                .any(|fixit| fixit.name == fixit_name)
        })
    }

    /// Returns the number of registered fixits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` if no fixit is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
