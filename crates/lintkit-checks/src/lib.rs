//! # lintkit-checks
//!
//! Built-in checks for lintkit.
//!
//! | Name | Level | Fixits |
//! |------|-------|--------|
//! | `no-unwrap-expect` | 0 | `fix-unwrap-to-question-mark`, `fix-expect-to-question-mark` |
//! | `require-tracing` | 1 | `fix-log-to-tracing` |
//! | `no-sync-io` | 2 | |
//! | `no-panic-macros` | 3, hidden | |
//!
//! ## Usage
//!
//! ```ignore
//! use lintkit_core::CheckManager;
//!
//! let mut manager = CheckManager::new();
//! lintkit_checks::register_all(&mut manager)?;
//! manager.create_checkers(&["no-unwrap-expect"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod no_panic_macros;
pub mod no_sync_io;
pub mod no_unwrap_expect;
pub mod require_tracing;

pub use no_panic_macros::NoPanicMacros;
pub use no_sync_io::NoSyncIo;
pub use no_unwrap_expect::NoUnwrapExpect;
pub use require_tracing::RequireTracing;

use lintkit_core::{CheckManager, RegistryError};

/// Registers every built-in check and fixit, in listing order.
///
/// # Errors
///
/// Returns an error if a fixit name collides with one already registered
/// on `manager`.
pub fn register_all(manager: &mut CheckManager) -> Result<(), RegistryError> {
    no_unwrap_expect::register(manager)?;
    require_tracing::register(manager)?;
    no_sync_io::register(manager)?;
    no_panic_macros::register(manager)?;
    tracing::debug!(
        "Registered {} built-in checks",
        manager.registry().len()
    );
    Ok(())
}
