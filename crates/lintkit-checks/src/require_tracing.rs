//! Check requiring the `tracing` crate instead of `log`.
//!
//! # Detected Patterns
//!
//! - `log::info!`, `log::warn!` and any other macro under `log::`
//! - `use log::...` imports
//!
//! # Fixits
//!
//! `fix-log-to-tracing` rewrites the leading `log` path segment to
//! `tracing`. The macro names line up for the common levels.

use lintkit_core::utils::{check_allow_with_reason, missing_reason_violation, path_to_string};
use lintkit_core::{
    Check, CheckBox, CheckFlags, CheckManager, FileContext, FixitId, Location, RegistryError,
    Replacement, Suggestion, Violation,
};
use syn::visit::Visit;
use syn::{Ident, ItemUse, UseTree};

/// Check name for require-tracing.
pub const NAME: &str = "require-tracing";

/// Fixit rewriting `log::` paths to `tracing::`.
pub const FIX_LOG_TO_TRACING: &str = "fix-log-to-tracing";

/// Id of [`FIX_LOG_TO_TRACING`].
pub const FIX_LOG_TO_TRACING_ID: FixitId = FixitId::new(0x1);

/// Requires `tracing` crate instead of `log` crate.
#[derive(Debug, Clone, Default)]
pub struct RequireTracing {
    fixits: FixitId,
}

impl RequireTracing {
    /// Creates the check with fixits disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Registers the check and its fixit.
///
/// # Errors
///
/// Returns an error if the fixit name is already taken.
pub fn register(manager: &mut CheckManager) -> Result<(), RegistryError> {
    manager.register_check(NAME, CheckFlags::LEVEL1, || -> CheckBox {
        Box::new(RequireTracing::new())
    })?;
    manager.register_fixit(FIX_LOG_TO_TRACING_ID, FIX_LOG_TO_TRACING, NAME)
}

impl Check for RequireTracing {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Requires tracing crate instead of log crate"
    }

    fn enabled_fixits(&self) -> FixitId {
        self.fixits
    }

    fn set_enabled_fixits(&mut self, fixits: FixitId) {
        self.fixits = fixits;
    }

    fn check(&self, ctx: &FileContext, ast: &syn::File) -> Vec<Violation> {
        let mut visitor = TracingVisitor {
            ctx,
            check: self,
            violations: Vec::new(),
        };

        visitor.visit_file(ast);
        visitor.violations
    }
}

struct TracingVisitor<'a> {
    ctx: &'a FileContext<'a>,
    check: &'a RequireTracing,
    violations: Vec<Violation>,
}

impl TracingVisitor<'_> {
    /// Reports `log_ident`, the `log` segment at the head of a path.
    fn report(&mut self, log_ident: &Ident, message: String, suggestion: String) {
        let span = log_ident.span();
        let start = span.start();
        let location = Location::new(self.ctx.relative_path.clone(), start.line, start.column + 1);

        let allow = check_allow_with_reason(self.ctx.content, start.line, NAME);
        if allow.is_allowed() {
            if self.check.requires_allow_reason() && allow.reason().is_none() {
                self.violations
                    .push(missing_reason_violation(NAME, location));
            }
            return;
        }

        let (offset, len) = self.ctx.byte_range(span);
        let location = location.with_span(offset, len);
        let mut violation = Violation::new(
            NAME,
            self.check.default_severity(),
            location.clone(),
            message,
        )
        .with_suggestion(Suggestion::new(suggestion));

        if self.check.is_fixit_enabled(FIX_LOG_TO_TRACING_ID) {
            violation =
                violation.with_replacement(Replacement::new(FIX_LOG_TO_TRACING, location, "tracing"));
        }
        self.violations.push(violation);
    }
}

impl<'ast> Visit<'ast> for TracingVisitor<'_> {
    fn visit_macro(&mut self, node: &'ast syn::Macro) {
        let path_str = path_to_string(&node.path);

        if let Some(macro_name) = path_str.strip_prefix("log::") {
            if let Some(first) = node.path.segments.first() {
                self.report(
                    &first.ident,
                    format!("Use `tracing::{macro_name}!` instead of `log::{macro_name}!`"),
                    format!("Replace with `tracing::{macro_name}!` for structured logging"),
                );
            }
        }

        syn::visit::visit_macro(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast ItemUse) {
        let mut heads = Vec::new();
        log_heads(&node.tree, &mut heads);
        for ident in heads {
            self.report(
                ident,
                "Import from `tracing` instead of `log`".to_string(),
                "Replace `use log::...` with `use tracing::...`".to_string(),
            );
        }

        syn::visit::visit_item_use(self, node);
    }
}

/// Collects every `log` crate root in a use tree, including `use log;`,
/// `use log as l;` and the branches of `use {log::info, ..};`.
fn log_heads<'a>(tree: &'a UseTree, out: &mut Vec<&'a Ident>) {
    match tree {
        UseTree::Path(path) if path.ident == "log" => out.push(&path.ident),
        UseTree::Name(name) if name.ident == "log" => out.push(&name.ident),
        UseTree::Rename(rename) if rename.ident == "log" => out.push(&rename.ident),
        UseTree::Group(group) => {
            for item in &group.items {
                log_heads(item, out);
            }
        }
        _ => {}
    }
}
