//! Check forbidding panicking macros outside tests.
//!
//! Registered hidden: it never runs as part of a level and must be named
//! explicitly.

use lintkit_core::utils::{
    check_allow_with_reason, has_cfg_test, has_test_attr, missing_reason_violation, path_to_string,
};
use lintkit_core::{
    Check, CheckBox, CheckFlags, CheckManager, FileContext, FixitId, Location, RegistryError,
    Severity, Suggestion, Violation,
};
use syn::visit::Visit;
use syn::{ItemFn, ItemMod};

/// Check name for no-panic-macros.
pub const NAME: &str = "no-panic-macros";

const PANIC_MACROS: &[(&str, &str)] = &[
    ("panic", "Return Result instead of panicking"),
    ("todo", "Implement the functionality or return Result"),
    ("unimplemented", "Implement the functionality or return Result"),
    ("unreachable", "Use Result or proper error handling instead"),
];

/// Forbids `panic!`, `todo!`, `unimplemented!` and `unreachable!`.
#[derive(Debug, Clone, Default)]
pub struct NoPanicMacros {
    fixits: FixitId,
}

impl NoPanicMacros {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Registers the check as a hidden level-3 check.
///
/// # Errors
///
/// Returns an error only if registration itself is rejected.
pub fn register(manager: &mut CheckManager) -> Result<(), RegistryError> {
    manager.register_check(NAME, CheckFlags::LEVEL3 | CheckFlags::HIDDEN, || -> CheckBox {
        Box::new(NoPanicMacros::new())
    })
}

impl Check for NoPanicMacros {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Forbids panic macros outside tests"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn enabled_fixits(&self) -> FixitId {
        self.fixits
    }

    fn set_enabled_fixits(&mut self, fixits: FixitId) {
        self.fixits = fixits;
    }

    fn check(&self, ctx: &FileContext, ast: &syn::File) -> Vec<Violation> {
        if ctx.is_test {
            return Vec::new();
        }

        let mut visitor = PanicVisitor {
            ctx,
            check: self,
            violations: Vec::new(),
            in_test_context: false,
        };

        visitor.visit_file(ast);
        visitor.violations
    }
}

struct PanicVisitor<'a> {
    ctx: &'a FileContext<'a>,
    check: &'a NoPanicMacros,
    violations: Vec<Violation>,
    in_test_context: bool,
}

impl PanicVisitor<'_> {
    fn check_panic_macro(&mut self, path: &syn::Path) {
        if self.in_test_context {
            return;
        }

        let path_str = path_to_string(path);
        let base = path_str.rsplit("::").next().unwrap_or(&path_str);
        let Some((macro_name, suggestion)) = PANIC_MACROS.iter().find(|(m, _)| *m == base) else {
            return;
        };
        let Some(first) = path.segments.first() else {
            return;
        };

        let start = first.ident.span().start();
        let location = Location::new(self.ctx.relative_path.clone(), start.line, start.column + 1);

        let allow = check_allow_with_reason(self.ctx.content, start.line, NAME);
        if allow.is_allowed() {
            if self.check.requires_allow_reason() && allow.reason().is_none() {
                self.violations
                    .push(missing_reason_violation(NAME, location));
            }
            return;
        }

        self.violations.push(
            Violation::new(
                NAME,
                self.check.default_severity(),
                location,
                format!("`{macro_name}!` is forbidden outside tests"),
            )
            .with_suggestion(Suggestion::new(*suggestion)),
        );
    }
}

impl<'ast> Visit<'ast> for PanicVisitor<'_> {
    fn visit_item_mod(&mut self, node: &'ast ItemMod) {
        let was_in_test = self.in_test_context;
        if has_cfg_test(&node.attrs) {
            self.in_test_context = true;
        }

        syn::visit::visit_item_mod(self, node);
        self.in_test_context = was_in_test;
    }

    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        let was_in_test = self.in_test_context;
        if has_test_attr(&node.attrs) {
            self.in_test_context = true;
        }

        syn::visit::visit_item_fn(self, node);
        self.in_test_context = was_in_test;
    }

    fn visit_macro(&mut self, node: &'ast syn::Macro) {
        self.check_panic_macro(&node.path);
        syn::visit::visit_macro(self, node);
    }
}
