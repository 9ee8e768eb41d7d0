//! Violations, fixit replacements and run results.

use crate::context::line_column_offset;
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail the run.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the analysis root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in the file.
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a location from a line and column.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Creates a location from the start of a `proc_macro2` span.
    #[must_use]
    pub fn from_span(file: PathBuf, span: proc_macro2::Span) -> Self {
        let start = span.start();
        Self::new(file, start.line, start.column + 1)
    }

    /// Sets the byte offset and length.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A human-readable hint on how to resolve a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Hint text.
    pub message: String,
}

impl Suggestion {
    /// Creates a suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A source replacement produced by an enabled fixit.
///
/// Replacements are only described; applying them is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// Name of the fixit that produced this replacement.
    pub fixit: String,
    /// Span to replace.
    pub location: Location,
    /// Text to put in its place.
    pub new_text: String,
}

impl Replacement {
    /// Creates a replacement.
    #[must_use]
    pub fn new(fixit: impl Into<String>, location: Location, new_text: impl Into<String>) -> Self {
        Self {
            fixit: fixit.into(),
            location,
            new_text: new_text.into(),
        }
    }
}

/// A finding reported by a check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Name of the reporting check (e.g. "no-unwrap-expect").
    pub check: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
    /// Replacements from enabled fixits.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replacements: Vec<Replacement>,
}

impl Violation {
    /// Creates a violation.
    #[must_use]
    pub fn new(
        check: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            check: check.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
            replacements: Vec::new(),
        }
    }

    /// Adds a suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Adds a fixit replacement.
    #[must_use]
    pub fn with_replacement(mut self, replacement: Replacement) -> Self {
        self.replacements.push(replacement);
        self
    }

    /// Returns `true` if an enabled fixit produced a replacement.
    #[must_use]
    pub fn is_fixable(&self) -> bool {
        !self.replacements.is_empty()
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} at {}:{}:{}\n",
            self.check,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        for r in &self.replacements {
            let _ = writeln!(
                output,
                "  = fix ({}): replace {}:{} with `{}`",
                r.fixit, r.location.line, r.location.column, r.new_text
            );
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.check,
            self.message
        )
    }
}

/// A violation as a miette diagnostic, for rich rendering.
///
/// Carries the file contents so the label can point into the source.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl ViolationDiagnostic {
    /// Builds the diagnostic for `violation` found in `source`.
    ///
    /// Locations without a byte span are resolved from their line and
    /// column and label a single character.
    #[must_use]
    pub fn new(violation: &Violation, source: String) -> Self {
        let location = &violation.location;
        let span = if location.length > 0 {
            SourceSpan::from((location.offset, location.length))
        } else {
            let offset = line_column_offset(&source, location.line, location.column);
            let length = source[offset..].chars().next().map_or(0, char::len_utf8);
            SourceSpan::from((offset, length))
        };

        let label_message = match violation.replacements.first() {
            Some(r) => format!("{}: replace with `{}`", r.fixit, r.new_text),
            None => violation.check.clone(),
        };

        Self {
            message: format!("[{}] {}", violation.check, violation.message),
            help: violation.suggestion.as_ref().map(|s| s.message.clone()),
            source_code: NamedSource::new(location.file.display().to_string(), source),
            span,
            label_message,
        }
    }
}

/// Result of an analysis run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Checks that ran, in activation order.
    #[serde(default)]
    pub checks: Vec<String>,
}

impl LintResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Checks if any violation meets or exceeds `severity`.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Counts violations as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.violations
            .iter()
            .fold((0, 0, 0), |(e, w, i), v| match v.severity {
                Severity::Error => (e + 1, w, i),
                Severity::Warning => (e, w + 1, i),
                Severity::Info => (e, w, i + 1),
            })
    }

    /// Number of violations carrying at least one replacement.
    #[must_use]
    pub fn fixable_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_fixable()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "no-unwrap-expect",
            severity,
            Location::new(PathBuf::from("src/lib.rs"), 42, 10),
            ".unwrap() is forbidden in production code",
        )
    }

    #[test]
    fn display_is_compact() {
        let v = make_violation(Severity::Error);
        assert_eq!(
            v.to_string(),
            "src/lib.rs:42:10: error [no-unwrap-expect] .unwrap() is forbidden in production code"
        );
    }

    #[test]
    fn format_lists_help_and_fixes() {
        let v = make_violation(Severity::Error)
            .with_suggestion(Suggestion::new("Use ? operator"))
            .with_replacement(Replacement::new(
                "fix-unwrap-to-question-mark",
                Location::new(PathBuf::from("src/lib.rs"), 42, 9),
                "?",
            ));
        let formatted = v.format();
        assert!(formatted.contains("= help: Use ? operator"));
        assert!(formatted.contains("= fix (fix-unwrap-to-question-mark): replace 42:9 with `?`"));
        assert!(v.is_fixable());
    }

    #[test]
    fn diagnostic_points_into_the_source() {
        let source = "fn f() {\n    let x = g().unwrap();\n}\n".to_string();

        let plain = Violation::new(
            "no-unwrap-expect",
            Severity::Error,
            Location::new(PathBuf::from("src/lib.rs"), 2, 17),
            ".unwrap() is forbidden in production code",
        )
        .with_suggestion(Suggestion::new("Use ? operator"));
        let diag = ViolationDiagnostic::new(&plain, source.clone());
        let label = diag.labels().and_then(|mut l| l.next()).expect("one label");
        assert_eq!(&source[label.offset()..label.offset() + label.len()], "u");
        assert_eq!(label.label(), Some("no-unwrap-expect"));
        assert_eq!(diag.help().map(|h| h.to_string()), Some("Use ? operator".to_string()));
        assert_eq!(
            diag.to_string(),
            "[no-unwrap-expect] .unwrap() is forbidden in production code"
        );

        let fixed = plain.clone().with_replacement(Replacement::new(
            "fix-unwrap-to-question-mark",
            Location::new(PathBuf::from("src/lib.rs"), 2, 15).with_span(24, 9),
            "?",
        ));
        let fixed = Violation {
            location: fixed.replacements[0].location.clone(),
            ..fixed
        };
        let diag = ViolationDiagnostic::new(&fixed, source.clone());
        let label = diag.labels().and_then(|mut l| l.next()).expect("one label");
        assert_eq!(&source[label.offset()..label.offset() + label.len()], ".unwrap()");
        assert_eq!(
            label.label(),
            Some("fix-unwrap-to-question-mark: replace with `?`")
        );
    }

    #[test]
    fn counts_by_severity() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Warning));
        result.violations.push(make_violation(Severity::Error));
        result.violations.push(make_violation(Severity::Warning));

        assert_eq!(result.count_by_severity(), (1, 2, 0));
        assert!(result.has_errors());
        assert_eq!(result.fixable_count(), 0);
    }

    #[test]
    fn has_violations_at_threshold() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Warning));
        assert!(!result.has_violations_at(Severity::Error));
        assert!(result.has_violations_at(Severity::Warning));
        assert!(result.has_violations_at(Severity::Info));
    }

    #[test]
    fn replacements_are_omitted_when_empty() {
        let v = make_violation(Severity::Info);
        let value = toml::Value::try_from(&v).expect("serializable");
        assert!(value.get("replacements").is_none());
        assert_eq!(
            value.get("severity").and_then(toml::Value::as_str),
            Some("info")
        );
    }
}
