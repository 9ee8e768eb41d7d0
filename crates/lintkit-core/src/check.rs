//! The check trait and fixit identifiers.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::context::FileContext;
use crate::types::{Severity, Violation};

/// Identifier of a fixit, meaningful only within the check that owns it.
///
/// Ids are bit values. Several fixits of one check are enabled at once by
/// combining their ids with `|`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixitId(u32);

impl FixitId {
    /// No fixit.
    pub const NONE: Self = Self(0);

    /// Creates an id from its raw bits.
    #[must_use]
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if no fixit bit is set.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every bit of `other` is set in `self`.
    ///
    /// [`FixitId::NONE`] is never contained.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }
}

impl BitOr for FixitId {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FixitId {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for FixitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A pluggable analysis check based on `syn` AST analysis.
///
/// Instances are only ever built by the zero-argument factory registered
/// with the [`CheckManager`](crate::CheckManager). The manager switches
/// fixits on through [`Check::set_enabled_fixits`] before the instance is
/// handed to a driver.
///
/// # Example
///
/// ```ignore
/// use lintkit_core::{Check, FileContext, FixitId, Violation};
///
/// #[derive(Default)]
/// pub struct NoTodoComments {
///     fixits: FixitId,
/// }
///
/// impl Check for NoTodoComments {
///     fn name(&self) -> &str { "no-todo-comments" }
///     fn enabled_fixits(&self) -> FixitId { self.fixits }
///     fn set_enabled_fixits(&mut self, fixits: FixitId) { self.fixits = fixits; }
///
///     fn check(&self, ctx: &FileContext, ast: &syn::File) -> Vec<Violation> {
///         let mut visitor = TodoVisitor::new(ctx, self);
///         visitor.visit_file(ast);
///         visitor.violations
///     }
/// }
/// ```
pub trait Check: Send + Sync {
    /// Returns the kebab-case name this check was registered under.
    fn name(&self) -> &str;

    /// Returns a brief description of what this check looks for.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this check.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Whether an allow directive for this check must carry a reason.
    ///
    /// By default, checks with `Severity::Error` require a reason.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Returns the fixits currently enabled on this instance.
    fn enabled_fixits(&self) -> FixitId;

    /// Replaces the set of enabled fixits.
    fn set_enabled_fixits(&mut self, fixits: FixitId);

    /// Returns `true` if `fixit` is enabled on this instance.
    fn is_fixit_enabled(&self, fixit: FixitId) -> bool {
        self.enabled_fixits().contains(fixit)
    }

    /// Checks a single file and returns any violations found.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Context about the file being checked
    /// * `ast` - The parsed syntax tree of the file
    fn check(&self, ctx: &FileContext, ast: &syn::File) -> Vec<Violation>;
}

/// Type alias for boxed [`Check`] trait objects.
pub type CheckBox = Box<dyn Check>;

impl fmt::Debug for dyn Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("name", &self.name())
            .field("enabled_fixits", &self.enabled_fixits())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;
    use std::path::PathBuf;

    #[derive(Default)]
    struct TestCheck {
        fixits: FixitId,
    }

    impl Check for TestCheck {
        fn name(&self) -> &str {
            "test-check"
        }

        fn enabled_fixits(&self) -> FixitId {
            self.fixits
        }

        fn set_enabled_fixits(&mut self, fixits: FixitId) {
            self.fixits = fixits;
        }

        fn check(&self, ctx: &FileContext, _ast: &syn::File) -> Vec<Violation> {
            vec![Violation::new(
                self.name(),
                self.default_severity(),
                Location::new(ctx.relative_path.clone(), 1, 1),
                "Test violation",
            )]
        }
    }

    #[test]
    fn fixit_ids_combine_with_bitor() {
        let a = FixitId::new(0x1);
        let b = FixitId::new(0x2);
        let both = a | b;

        assert_eq!(both.bits(), 0x3);
        assert!(both.contains(a));
        assert!(both.contains(b));
        assert!(!a.contains(b));
    }

    #[test]
    fn none_is_never_contained() {
        assert!(FixitId::NONE.is_none());
        assert!(!FixitId::new(0x7).contains(FixitId::NONE));
    }

    #[test]
    fn bitor_assign_accumulates() {
        let mut ids = FixitId::NONE;
        ids |= FixitId::new(0x4);
        ids |= FixitId::new(0x1);
        assert_eq!(ids, FixitId::new(0x5));
        assert_eq!(ids.to_string(), "0x5");
    }

    #[test]
    fn check_trait_defaults() {
        let mut check = TestCheck::default();
        assert_eq!(check.default_severity(), Severity::Warning);
        assert!(!check.requires_allow_reason());
        assert!(!check.is_fixit_enabled(FixitId::new(0x1)));

        check.set_enabled_fixits(FixitId::new(0x1));
        assert!(check.is_fixit_enabled(FixitId::new(0x1)));
        assert!(!check.is_fixit_enabled(FixitId::new(0x2)));

        let ast = syn::parse_file("fn main() {}").expect("valid source");
        let path = PathBuf::from("src/main.rs");
        let ctx = FileContext::new(&path, "fn main() {}", std::path::Path::new("."));
        assert_eq!(check.check(&ctx, &ast).len(), 1);
    }
}
