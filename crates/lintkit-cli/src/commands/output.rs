//! Shared output formatting for lint results.

use anyhow::Result;
use lintkit_core::{LintResult, Severity, ViolationDiagnostic};
use miette::{GraphicalReportHandler, GraphicalTheme};
use std::fmt::Write;
use std::io::IsTerminal;
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is the analyzed directory; violation paths are relative to it.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Rich => {
            let theme = if std::io::stdout().is_terminal() {
                GraphicalTheme::unicode()
            } else {
                GraphicalTheme::unicode_nocolor()
            };
            print!("{}", render_rich(result, root, theme));
        }
    }
    Ok(())
}

/// Renders every violation as a miette report with a source snippet.
///
/// Violations whose file can no longer be read fall back to the compact
/// one-line form.
pub fn render_rich(result: &LintResult, root: &Path, theme: GraphicalTheme) -> String {
    let handler = GraphicalReportHandler::new_themed(theme);
    let mut out = String::new();

    for violation in &result.violations {
        let path = root.join(&violation.location.file);
        let rendered = std::fs::read_to_string(&path).ok().and_then(|source| {
            let diag = ViolationDiagnostic::new(violation, source);
            let mut text = String::new();
            handler.render_report(&mut text, &diag).ok().map(|()| text)
        });
        match rendered {
            Some(text) => out.push_str(&text),
            None => {
                tracing::debug!("Cannot render {} with source", path.display());
                out.push_str(&violation.to_string());
                out.push('\n');
            }
        }
    }

    let (errors, warnings, infos) = result.count_by_severity();
    let _ = writeln!(
        out,
        "Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s)",
        result.files_checked
    );
    out
}

fn print_text(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();

    for violation in &result.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} at {}:{}:{}",
            violation.check,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        println!("  {}: {}", severity_indicator, violation.message);
        if let Some(suggestion) = &violation.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        for r in &violation.replacements {
            println!(
                "  = \x1b[32mfix\x1b[0m ({}): replace {}:{} with `{}`",
                r.fixit, r.location.line, r.location.column, r.new_text
            );
        }
        println!();
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    );
    let fixable = result.fixable_count();
    if fixable > 0 {
        println!("{fixable} violation(s) carry a fixit replacement");
    }
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintkit_core::{Location, Replacement, Suggestion, Violation};
    use std::path::PathBuf;

    #[test]
    fn rich_output_shows_source_snippet_and_fix() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("src")).expect("mkdir");
        let source = "fn f() -> Option<u8> {\n    let x = g().unwrap();\n    Some(x)\n}\n";
        std::fs::write(dir.path().join("src/lib.rs"), source).expect("write");

        let offset = source.find(".unwrap()").expect("present");
        let location = Location::new(PathBuf::from("src/lib.rs"), 2, 16).with_span(offset, 9);
        let violation = Violation::new(
            "no-unwrap-expect",
            Severity::Error,
            location.clone(),
            ".unwrap() is forbidden in production code",
        )
        .with_suggestion(Suggestion::new("Use `?` operator"))
        .with_replacement(Replacement::new("fix-unwrap-to-question-mark", location, "?"));

        let mut result = LintResult::new();
        result.violations.push(violation);
        result.files_checked = 1;

        let text = render_rich(&result, dir.path(), GraphicalTheme::unicode_nocolor());
        assert!(text.contains("[no-unwrap-expect] .unwrap() is forbidden in production code"));
        assert!(text.contains("src/lib.rs:2:"));
        assert!(text.contains("let x = g().unwrap();"));
        assert!(text.contains("fix-unwrap-to-question-mark: replace with `?`"));
        assert!(text.contains("Use `?` operator"));
        assert!(text.ends_with("Found 1 error(s), 0 warning(s), 0 info(s) in 1 file(s)\n"));
    }

    #[test]
    fn rich_output_falls_back_when_file_is_gone() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut result = LintResult::new();
        result.violations.push(Violation::new(
            "no-sync-io",
            Severity::Error,
            Location::new(PathBuf::from("src/gone.rs"), 3, 5),
            "Blocking call in async context",
        ));

        let text = render_rich(&result, dir.path(), GraphicalTheme::unicode_nocolor());
        assert!(text.starts_with("src/gone.rs:3:5: error [no-sync-io] Blocking call in async context\n"));
    }
}
