//! Registration, activation and analysis wired together.

use std::fs;
use std::path::Path;

use lintkit_core::{
    Analyzer, Check, CheckBox, CheckFlags, CheckLevel, CheckManager, FileContext, FixitId,
    FixitRequest, LintResult, Location, Replacement, Violation,
};

const RENAME_TODO: FixitId = FixitId::new(0x1);

/// Flags functions called `todo_*` and, with its fixit on, renames them.
#[derive(Default)]
struct NoTodoFns {
    fixits: FixitId,
}

impl Check for NoTodoFns {
    fn name(&self) -> &str {
        "no-todo-fns"
    }

    fn enabled_fixits(&self) -> FixitId {
        self.fixits
    }

    fn set_enabled_fixits(&mut self, fixits: FixitId) {
        self.fixits = fixits;
    }

    fn check(&self, ctx: &FileContext, ast: &syn::File) -> Vec<Violation> {
        let mut out = Vec::new();
        for item in &ast.items {
            let syn::Item::Fn(f) = item else { continue };
            let ident = f.sig.ident.to_string();
            let Some(rest) = ident.strip_prefix("todo_") else {
                continue;
            };
            let span = f.sig.ident.span();
            let (offset, len) = ctx.byte_range(span);
            let location =
                Location::from_span(ctx.relative_path.clone(), span).with_span(offset, len);
            let mut v = Violation::new(
                self.name(),
                self.default_severity(),
                location.clone(),
                format!("unfinished function `{ident}`"),
            );
            if self.is_fixit_enabled(RENAME_TODO) {
                v = v.with_replacement(Replacement::new("fix-rename-todo", location, rest));
            }
            out.push(v);
        }
        out
    }
}

/// Never reports anything.
#[derive(Default)]
struct Quiet {
    fixits: FixitId,
}

impl Check for Quiet {
    fn name(&self) -> &str {
        "quiet"
    }

    fn enabled_fixits(&self) -> FixitId {
        self.fixits
    }

    fn set_enabled_fixits(&mut self, fixits: FixitId) {
        self.fixits = fixits;
    }

    fn check(&self, _ctx: &FileContext, _ast: &syn::File) -> Vec<Violation> {
        Vec::new()
    }
}

fn manager(request: FixitRequest) -> CheckManager {
    let mut manager = CheckManager::new().with_fixit_request(request);
    manager
        .register_check("quiet", CheckFlags::LEVEL0, || -> CheckBox {
            Box::new(Quiet::default())
        })
        .expect("register quiet");
    manager
        .register_check("no-todo-fns", CheckFlags::LEVEL2, || -> CheckBox {
            Box::new(NoTodoFns::default())
        })
        .expect("register no-todo-fns");
    manager
        .register_fixit(RENAME_TODO, "fix-rename-todo", "no-todo-fns")
        .expect("register fixit");
    manager
}

fn analyze(manager: &CheckManager, root: &Path) -> LintResult {
    Analyzer::builder()
        .root(root)
        .build()
        .expect("build analyzer")
        .analyze(manager.created_checks())
        .expect("analyze")
}

fn render(result: &LintResult) -> String {
    result
        .violations
        .iter()
        .map(|v| v.format().trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("src")).expect("mkdir");
    fs::write(
        dir.path().join("src/lib.rs"),
        "pub fn done() {}\n\npub fn todo_parse() {}\n",
    )
    .expect("write");
    dir
}

#[test]
fn level_selection_excludes_higher_levels() {
    let manager = manager(FixitRequest::Disabled);
    assert_eq!(manager.checks_for_level(CheckLevel::Level1), vec!["quiet"]);
    assert_eq!(
        manager.checks_for_level(CheckLevel::Level3),
        vec!["quiet", "no-todo-fns"]
    );
}

#[test]
fn requested_fixit_pulls_in_its_check() {
    let dir = project();
    let mut manager = manager(FixitRequest::Named("fix-rename-todo".to_string()));

    let report = manager.create_checkers(&["quiet"]);
    assert_eq!(report.created, vec!["quiet", "no-todo-fns"]);
    assert_eq!(report.implicit_check.as_deref(), Some("no-todo-fns"));
    assert!(report.is_clean());

    let result = analyze(&manager, dir.path());
    assert_eq!(result.checks, vec!["quiet", "no-todo-fns"]);
    assert_eq!(result.fixable_count(), 1);
    insta::assert_snapshot!(render(&result), @r"
    no-todo-fns at src/lib.rs:3:8
      warning: unfinished function `todo_parse`
      = fix (fix-rename-todo): replace 3:8 with `parse`
    ");

    let replacement = &result.violations[0].replacements[0];
    let source = fs::read_to_string(dir.path().join("src/lib.rs")).expect("read");
    let start = replacement.location.offset;
    let end = start + replacement.location.length;
    assert_eq!(&source[start..end], "todo_parse");
}

#[test]
fn without_fixits_violations_carry_no_replacements() {
    let dir = project();
    let mut manager = manager(FixitRequest::Disabled);

    let report = manager.create_checkers(&["no-todo-fns"]);
    assert_eq!(report.created, vec!["no-todo-fns"]);

    let result = analyze(&manager, dir.path());
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.fixable_count(), 0);
}

#[test]
fn all_fixits_only_touches_requested_checks() {
    let dir = project();
    let mut manager = manager(FixitRequest::All);

    let report = manager.create_checkers(&["quiet"]);
    assert_eq!(report.created, vec!["quiet"]);
    assert!(report.implicit_check.is_none());
    assert!(analyze(&manager, dir.path()).violations.is_empty());

    manager.create_checkers(&["no-todo-fns"]);
    assert_eq!(analyze(&manager, dir.path()).fixable_count(), 1);
}

#[test]
fn unknown_names_are_reported_not_fatal() {
    let mut manager = manager(FixitRequest::Named("fix-nothing".to_string()));

    let report = manager.create_checkers(&["quiet", "missing"]);
    assert_eq!(report.created, vec!["quiet"]);
    assert_eq!(report.unknown_checks, vec!["missing"]);
    assert_eq!(report.unknown_fixit.as_deref(), Some("fix-nothing"));
    assert!(!report.is_clean());
    assert!(manager.fixits_enabled());
    assert!(!manager.all_fixits_enabled());
}
