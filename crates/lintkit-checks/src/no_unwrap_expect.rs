//! Check forbidding `.unwrap()` and `.expect()` in production code.
//!
//! # Rationale
//!
//! Both calls panic on failure. Production code should propagate the
//! error instead.
//!
//! # Fixits
//!
//! - `fix-unwrap-to-question-mark` rewrites `.unwrap()` to `?`
//! - `fix-expect-to-question-mark` rewrites `.expect(..)` to `?`
//!
//! A replacement is only offered inside functions returning `Result` or
//! `Option`. It is skipped when the receiver is visibly the other kind
//! (`.ok()` in a `Result` function, `.parse()` in an `Option` one), but the
//! receiver's type is not resolved, so an offered `?` may still need an
//! `.ok_or(..)` or `.ok()` to compile.
//!
//! # Suppression
//!
//! - `#[allow(clippy::unwrap_used)]` or `#[allow(clippy::expect_used)]` on the item
//! - `// lintkit: allow(no-unwrap-expect) reason="..."` comment

use lintkit_core::utils::{
    check_allow_with_reason, has_allow_attr, has_cfg_test, has_test_attr, missing_reason_violation,
};
use lintkit_core::{
    Check, CheckBox, CheckFlags, CheckManager, FileContext, FixitId, Location, RegistryError,
    Replacement, Severity, Suggestion, Violation,
};
use syn::spanned::Spanned;
use syn::visit::Visit;
use syn::{Expr, ExprClosure, ExprMethodCall, ImplItemFn, ItemFn, ItemMod, ReturnType, Type};

/// Check name for no-unwrap-expect.
pub const NAME: &str = "no-unwrap-expect";

/// Fixit turning `.unwrap()` into `?`.
pub const FIX_UNWRAP: &str = "fix-unwrap-to-question-mark";

/// Fixit turning `.expect(..)` into `?`.
pub const FIX_EXPECT: &str = "fix-expect-to-question-mark";

/// Id of [`FIX_UNWRAP`].
pub const FIX_UNWRAP_ID: FixitId = FixitId::new(0x1);

/// Id of [`FIX_EXPECT`].
pub const FIX_EXPECT_ID: FixitId = FixitId::new(0x2);

/// Forbids `.unwrap()` and `.expect()` calls in production code.
#[derive(Debug, Clone, Default)]
pub struct NoUnwrapExpect {
    fixits: FixitId,
}

impl NoUnwrapExpect {
    /// Creates the check with fixits disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Registers the check and its fixits.
///
/// # Errors
///
/// Returns an error if a fixit name is already taken.
pub fn register(manager: &mut CheckManager) -> Result<(), RegistryError> {
    manager.register_check(NAME, CheckFlags::LEVEL0, || -> CheckBox {
        Box::new(NoUnwrapExpect::new())
    })?;
    manager.register_fixit(FIX_UNWRAP_ID, FIX_UNWRAP, NAME)?;
    manager.register_fixit(FIX_EXPECT_ID, FIX_EXPECT, NAME)
}

impl Check for NoUnwrapExpect {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Forbids .unwrap() and .expect() in production code"
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

        let mut visitor = UnwrapExpectVisitor {
            ctx,
            check: self,
            violations: Vec::new(),
            in_test_context: false,
            in_allowed_context: false,
            try_kind: None,
        };

        visitor.visit_file(ast);
        visitor.violations
    }
}

struct UnwrapExpectVisitor<'a> {
    ctx: &'a FileContext<'a>,
    check: &'a NoUnwrapExpect,
    violations: Vec<Violation>,
    in_test_context: bool,
    in_allowed_context: bool,
    try_kind: Option<TryKind>,
}

/// What `?` propagates in the enclosing function or closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TryKind {
    Result,
    Option,
}

/// Methods whose return value is an `Option`.
const OPTION_METHODS: &[&str] = &[
    "ok", "err", "get", "get_mut", "first", "last", "next", "find", "pop", "checked_add",
    "checked_sub", "checked_mul", "checked_div", "strip_prefix", "strip_suffix",
];

/// Methods whose return value is a `Result`.
const RESULT_METHODS: &[&str] = &[
    "ok_or", "ok_or_else", "parse", "map_err", "try_into", "try_from",
];

impl UnwrapExpectVisitor<'_> {
    fn enter_fn(
        &mut self,
        attrs: &[syn::Attribute],
        output: &ReturnType,
    ) -> (bool, bool, Option<TryKind>) {
        let saved = (
            self.in_test_context,
            self.in_allowed_context,
            self.try_kind,
        );
        if has_test_attr(attrs) {
            self.in_test_context = true;
        }
        if has_allow_attr(attrs, &["clippy::unwrap_used", "clippy::expect_used"]) {
            self.in_allowed_context = true;
        }
        self.try_kind = try_kind(output);
        saved
    }

    fn leave_fn(&mut self, saved: (bool, bool, Option<TryKind>)) {
        (
            self.in_test_context,
            self.in_allowed_context,
            self.try_kind,
        ) = saved;
    }

    /// `?` applies when the function propagates and the receiver is not
    /// visibly the other kind.
    fn question_mark_applies(&self, receiver: &Expr) -> bool {
        match (self.try_kind, receiver_kind(receiver)) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(function), Some(receiver)) => function == receiver,
        }
    }

    /// `?` replacing everything from the dot to the closing paren.
    fn question_mark(&self, node: &ExprMethodCall, fixit: &str) -> Replacement {
        let dot = node.dot_token.span().start();
        let close = node.paren_token.span.close().end();
        let from = self.ctx.offset_for(dot.line, dot.column + 1);
        let to = self.ctx.offset_for(close.line, close.column + 1);

        let location = Location::new(self.ctx.relative_path.clone(), dot.line, dot.column + 1)
            .with_span(from, to.saturating_sub(from));
        Replacement::new(fixit, location, "?")
    }
}

impl<'ast> Visit<'ast> for UnwrapExpectVisitor<'_> {
    fn visit_item_mod(&mut self, node: &'ast ItemMod) {
        let was_in_test = self.in_test_context;
        if has_cfg_test(&node.attrs) {
            self.in_test_context = true;
        }

        syn::visit::visit_item_mod(self, node);
        self.in_test_context = was_in_test;
    }

    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        let saved = self.enter_fn(&node.attrs, &node.sig.output);
        syn::visit::visit_item_fn(self, node);
        self.leave_fn(saved);
    }

    fn visit_impl_item_fn(&mut self, node: &'ast ImplItemFn) {
        let saved = self.enter_fn(&node.attrs, &node.sig.output);
        syn::visit::visit_impl_item_fn(self, node);
        self.leave_fn(saved);
    }

    fn visit_expr_closure(&mut self, node: &'ast ExprClosure) {
        let was = self.try_kind;
        self.try_kind = try_kind(&node.output);
        syn::visit::visit_expr_closure(self, node);
        self.try_kind = was;
    }

    fn visit_expr_method_call(&mut self, node: &'ast ExprMethodCall) {
        if self.in_test_context || self.in_allowed_context {
            syn::visit::visit_expr_method_call(self, node);
            return;
        }

        let (fixit_id, fixit_name) = if node.method == "unwrap" && node.args.is_empty() {
            (FIX_UNWRAP_ID, FIX_UNWRAP)
        } else if node.method == "expect" && node.args.len() == 1 {
            (FIX_EXPECT_ID, FIX_EXPECT)
        } else {
            syn::visit::visit_expr_method_call(self, node);
            return;
        };
        let is_unwrap = fixit_id == FIX_UNWRAP_ID;

        let start = node.method.span().start();
        let location = Location::new(self.ctx.relative_path.clone(), start.line, start.column + 1);

        let allow = check_allow_with_reason(self.ctx.content, start.line, NAME);
        if allow.is_allowed() {
            if self.check.requires_allow_reason() && allow.reason().is_none() {
                self.violations
                    .push(missing_reason_violation(NAME, location));
            }
            syn::visit::visit_expr_method_call(self, node);
            return;
        }

        let (message, suggestion) = if is_unwrap {
            (
                ".unwrap() is forbidden in production code",
                "Use `?` operator, `.ok_or(Error)?`, or pattern matching",
            )
        } else {
            (
                ".expect() is forbidden in production code",
                "Use `?` operator with `.context()` or custom error",
            )
        };
        let message = if is_unwrap && is_partial_cmp_chain(&node.receiver) {
            format!("{message} (NaN comparison danger with partial_cmp)")
        } else {
            message.to_string()
        };

        let mut violation = Violation::new(NAME, self.check.default_severity(), location, message)
            .with_suggestion(Suggestion::new(suggestion));
        if self.check.is_fixit_enabled(fixit_id) && self.question_mark_applies(&node.receiver) {
            violation = violation.with_replacement(self.question_mark(node, fixit_name));
        }
        self.violations.push(violation);

        syn::visit::visit_expr_method_call(self, node);
    }
}

fn try_kind(output: &ReturnType) -> Option<TryKind> {
    let ReturnType::Type(_, ty) = output else {
        return None;
    };
    let Type::Path(path) = ty.as_ref() else {
        return None;
    };
    let last = path.path.segments.last()?;
    if last.ident == "Result" {
        Some(TryKind::Result)
    } else if last.ident == "Option" {
        Some(TryKind::Option)
    } else {
        None
    }
}

/// Kind of `receiver` when it is evident from the syntax alone.
fn receiver_kind(receiver: &Expr) -> Option<TryKind> {
    match receiver {
        Expr::MethodCall(call) => {
            let method = call.method.to_string();
            if OPTION_METHODS.contains(&method.as_str()) {
                Some(TryKind::Option)
            } else if RESULT_METHODS.contains(&method.as_str()) {
                Some(TryKind::Result)
            } else {
                None
            }
        }
        Expr::Call(call) => {
            let Expr::Path(func) = call.func.as_ref() else {
                return None;
            };
            let last = func.path.segments.last()?;
            if last.ident == "Some" {
                Some(TryKind::Option)
            } else if last.ident == "Ok" || last.ident == "Err" {
                Some(TryKind::Result)
            } else {
                None
            }
        }
        Expr::Paren(inner) => receiver_kind(&inner.expr),
        _ => None,
    }
}

fn is_partial_cmp_chain(expr: &Expr) -> bool {
    matches!(expr, Expr::MethodCall(call) if call.method == "partial_cmp")
}
