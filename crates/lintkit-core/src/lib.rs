//! # lintkit-core
//!
//! Registry and activation core for the lintkit static analyzer.
//!
//! Checks register themselves once at start-up with a name, a set of
//! [`CheckFlags`] and a zero-argument factory. Fixits register under the
//! check that owns them. A [`CheckManager`] then turns a run's requested
//! check names plus an optional [`FixitRequest`] into an ordered set of live
//! [`Check`] instances, which the [`Analyzer`] runs over Rust sources.
//!
//! - [`CheckRegistry`] - ordered table of known checks
//! - [`FixitIndex`] - fixits by owning check and by name
//! - [`CheckManager`] - registration surface plus activation
//!
//! ## Example
//!
//! ```ignore
//! use lintkit_core::{Analyzer, CheckFlags, CheckManager, FixitId, FixitRequest};
//!
//! let mut manager = CheckManager::new().with_fixit_request(FixitRequest::from_env());
//! manager.register_check("my-check", CheckFlags::LEVEL0, || Box::new(MyCheck::default()))?;
//! manager.register_fixit(FixitId::new(0x1), "fix-my-check", "my-check")?;
//!
//! manager.create_checkers(&["my-check"]);
//! let result = Analyzer::builder().root("./src").build()?.analyze(manager.created_checks())?;
//! for violation in &result.violations {
//!     println!("{}", violation.format());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod check;
mod config;
mod context;
mod fixits;
mod flags;
mod manager;
mod registry;
mod request;
mod types;

pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use check::{Check, CheckBox, FixitId};
pub use config::{AnalyzerConfig, CheckConfig, Config, ConfigError};
pub use context::FileContext;
pub use fixits::{FixitIndex, RegisteredFixit};
pub use flags::{CheckFlags, CheckLevel};
pub use manager::{ActivationReport, CheckManager};
pub use registry::{CheckFactory, CheckRegistry, RegisteredCheck, RegistryError};
pub use request::{FixitRequest, ALL_FIXITS, FIXIT_ENV_VAR};
pub use types::{
    LintResult, Location, Replacement, Severity, Suggestion, Violation, ViolationDiagnostic,
};
