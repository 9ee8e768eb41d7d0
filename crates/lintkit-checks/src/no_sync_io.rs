//! Check forbidding blocking I/O inside async code.
//!
//! Only `async fn` bodies and `async` blocks are inspected. Blocking calls
//! there stall the executor thread.
//!
//! # Detected Patterns
//!
//! - `std::fs` functions, also when called as `fs::read` or `File::open`
//! - `std::thread::sleep`
//! - `.exists()`, `.is_file()` and friends on paths
//!
//! # Suppression
//!
//! - `#[allow(sync_io)]` on the function
//! - `// lintkit: allow(no-sync-io) reason="..."` comment

use lintkit_core::utils::{
    check_allow_with_reason, has_allow_attr, missing_reason_violation, path_to_string,
};
use lintkit_core::{
    Check, CheckBox, CheckFlags, CheckManager, FileContext, FixitId, Location, RegistryError,
    Severity, Suggestion, Violation,
};
use syn::visit::Visit;
use syn::{Expr, ExprAsync, ExprCall, ExprClosure, ExprMethodCall, ImplItemFn, ItemFn};

/// Check name for no-sync-io.
pub const NAME: &str = "no-sync-io";

const FORBIDDEN_CALLS: &[&str] = &[
    "std::fs::read",
    "std::fs::read_to_string",
    "std::fs::write",
    "std::fs::copy",
    "std::fs::create_dir",
    "std::fs::create_dir_all",
    "std::fs::remove_file",
    "std::fs::remove_dir",
    "std::fs::remove_dir_all",
    "std::fs::rename",
    "std::fs::metadata",
    "std::fs::canonicalize",
    "std::fs::read_dir",
    "std::fs::File::open",
    "std::fs::File::create",
    "std::thread::sleep",
];

const FORBIDDEN_PATH_METHODS: &[&str] =
    &["exists", "is_file", "is_dir", "read_dir", "canonicalize"];

/// Forbids synchronous I/O in async code.
#[derive(Debug, Clone, Default)]
pub struct NoSyncIo {
    fixits: FixitId,
}

impl NoSyncIo {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Registers the check. It defines no fixits.
///
/// # Errors
///
/// Returns an error only if registration itself is rejected.
pub fn register(manager: &mut CheckManager) -> Result<(), RegistryError> {
    manager.register_check(NAME, CheckFlags::LEVEL2, || -> CheckBox {
        Box::new(NoSyncIo::new())
    })
}

impl Check for NoSyncIo {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Forbids synchronous I/O in async code"
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
        let mut visitor = SyncIoVisitor {
            ctx,
            check: self,
            violations: Vec::new(),
            in_async: false,
            in_allowed_context: false,
        };

        visitor.visit_file(ast);
        visitor.violations
    }
}

struct SyncIoVisitor<'a> {
    ctx: &'a FileContext<'a>,
    check: &'a NoSyncIo,
    violations: Vec<Violation>,
    in_async: bool,
    in_allowed_context: bool,
}

impl SyncIoVisitor<'_> {
    fn enter_fn(&mut self, attrs: &[syn::Attribute], is_async: bool) -> (bool, bool) {
        let saved = (self.in_async, self.in_allowed_context);
        self.in_async = is_async;
        if has_allow_attr(attrs, &["sync_io"]) {
            self.in_allowed_context = true;
        }
        saved
    }

    fn active(&self) -> bool {
        self.in_async && !self.in_allowed_context
    }

    fn report(&mut self, span: proc_macro2::Span, message: String, suggestion: String) {
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

        self.violations.push(
            Violation::new(NAME, self.check.default_severity(), location, message)
                .with_suggestion(Suggestion::new(suggestion)),
        );
    }
}

impl<'ast> Visit<'ast> for SyncIoVisitor<'_> {
    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        let saved = self.enter_fn(&node.attrs, node.sig.asyncness.is_some());
        syn::visit::visit_item_fn(self, node);
        (self.in_async, self.in_allowed_context) = saved;
    }

    fn visit_impl_item_fn(&mut self, node: &'ast ImplItemFn) {
        let saved = self.enter_fn(&node.attrs, node.sig.asyncness.is_some());
        syn::visit::visit_impl_item_fn(self, node);
        (self.in_async, self.in_allowed_context) = saved;
    }

    fn visit_expr_async(&mut self, node: &'ast ExprAsync) {
        let was = self.in_async;
        self.in_async = true;
        syn::visit::visit_expr_async(self, node);
        self.in_async = was;
    }

    fn visit_expr_closure(&mut self, node: &'ast ExprClosure) {
        let was = self.in_async;
        self.in_async = node.asyncness.is_some();
        syn::visit::visit_expr_closure(self, node);
        self.in_async = was;
    }

    fn visit_expr_call(&mut self, node: &'ast ExprCall) {
        if self.active() {
            if let Expr::Path(expr) = &*node.func {
                let path_str = path_to_string(&expr.path);
                if let Some(full) = forbidden_call(&path_str) {
                    let span = expr
                        .path
                        .segments
                        .last()
                        .map_or_else(proc_macro2::Span::call_site, |s| s.ident.span());
                    self.report(
                        span,
                        format!("Synchronous I/O `{path_str}` blocks the async runtime"),
                        async_alternative(full),
                    );
                }
            }
        }

        syn::visit::visit_expr_call(self, node);
    }

    fn visit_expr_method_call(&mut self, node: &'ast ExprMethodCall) {
        if self.active() && node.args.is_empty() {
            let method_name = node.method.to_string();
            if FORBIDDEN_PATH_METHODS.contains(&method_name.as_str()) {
                self.report(
                    node.method.span(),
                    format!("`.{method_name}()` performs synchronous I/O"),
                    format!("Use `tokio::fs` or move `.{method_name}()` to a blocking task"),
                );
            }
        }

        syn::visit::visit_expr_method_call(self, node);
    }
}

/// Matches `path` against the forbidden list, allowing a shortened prefix
/// such as `fs::read` or `File::open`.
fn forbidden_call(path: &str) -> Option<&'static str> {
    if !path.contains("::") {
        return None;
    }
    FORBIDDEN_CALLS.iter().copied().find(|full| {
        *full == path
            || full
                .strip_suffix(path)
                .is_some_and(|prefix| prefix.ends_with("::"))
    })
}

fn async_alternative(path: &str) -> String {
    if path == "std::thread::sleep" {
        return "Use `tokio::time::sleep` instead".to_string();
    }
    match path.strip_prefix("std::fs::") {
        Some(rest) => format!("Use `tokio::fs::{rest}` instead"),
        None => "Use async I/O operations instead".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn check_code(code: &str) -> Vec<Violation> {
        let ast = syn::parse_file(code).expect("Failed to parse");
        let ctx = FileContext::new(Path::new("src/server.rs"), code, Path::new(""));
        NoSyncIo::new().check(&ctx, &ast)
    }

    #[test]
    fn test_detects_std_fs_in_async_fn() {
        let violations = check_code(
            r#"
async fn load() {
    let content = std::fs::read_to_string("file.txt");
}
"#,
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].suggestion.as_ref().map(|s| s.message.as_str()),
            Some("Use `tokio::fs::read_to_string` instead")
        );
    }

    #[test]
    fn test_ignores_sync_fn() {
        let violations = check_code(
            r#"
fn load() {
    let content = std::fs::read_to_string("file.txt");
}
"#,
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_detects_short_paths_and_async_blocks() {
        let violations = check_code(
            r#"
fn spawn() {
    let task = async {
        let f = File::open("a");
        fs::write("b", "c");
        thread::sleep(d);
    };
}
"#,
        );
        assert_eq!(violations.len(), 3);
        assert_eq!(
            violations[2].suggestion.as_ref().map(|s| s.message.as_str()),
            Some("Use `tokio::time::sleep` instead")
        );
    }

    #[test]
    fn test_allows_tokio_fs() {
        let violations = check_code(
            r#"
async fn load() {
    let content = tokio::fs::read_to_string("file.txt").await;
}
"#,
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_detects_path_exists() {
        let violations = check_code(
            r#"
impl Store {
    async fn has(&self, path: &Path) -> bool {
        path.exists()
    }
}
"#,
        );
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains(".exists()"));
    }

    #[test]
    fn test_allows_with_attribute() {
        let violations = check_code(
            r#"
#[allow(sync_io)]
async fn startup() {
    let config = std::fs::read_to_string("config.toml");
}
"#,
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_comment_requires_reason() {
        let violations = check_code(
            r#"
async fn load() {
    // lintkit: allow(no-sync-io)
    let a = std::fs::read("a");
    // lintkit: allow(no-sync-io) reason="Startup initialization only"
    let b = std::fs::read("b");
}
"#,
        );
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("missing required reason"));
        assert_eq!(violations[0].severity, Severity::Warning);
    }
}
