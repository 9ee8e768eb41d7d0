//! Comment directives that suppress a check on one line.
//!
//! ```text
//! // lintkit: allow(no-unwrap-expect) reason="startup initialization"
//! ```
//!
//! A directive applies to its own line and the line below it. `all`
//! suppresses every check.

use std::collections::HashSet;

use crate::types::{Location, Severity, Suggestion, Violation};

const DIRECTIVE_PREFIX: &str = "lintkit:";

/// Outcome of looking for an allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// No directive covers the check.
    Denied,
    /// A directive covers the check.
    Allowed {
        /// The reason given, if any.
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

#[derive(Debug)]
struct AllowDirective {
    checks: HashSet<String>,
    reason: Option<String>,
}

/// Looks for a directive allowing `check_name` at `line` (1-indexed).
#[must_use]
pub fn check_allow_with_reason(content: &str, line: usize, check_name: &str) -> AllowCheck {
    let lines: Vec<&str> = content.lines().collect();

    for candidate in [line.saturating_sub(1), line] {
        let Some(text) = candidate.checked_sub(1).and_then(|i| lines.get(i)) else {
            continue;
        };
        if let Some(directive) = parse_directive(text) {
            if directive.checks.contains(check_name) || directive.checks.contains("all") {
                return AllowCheck::Allowed {
                    reason: directive.reason,
                };
            }
        }
    }

    AllowCheck::Denied
}

/// Builds the warning reported when a directive lacks a required reason.
#[must_use]
pub fn missing_reason_violation(check_name: &str, location: Location) -> Violation {
    Violation::new(
        check_name,
        Severity::Warning,
        location,
        format!("Allow directive for '{check_name}' is missing required reason"),
    )
    .with_suggestion(Suggestion::new(
        "Add reason=\"...\" to explain why this exception is necessary",
    ))
}

fn parse_directive(line: &str) -> Option<AllowDirective> {
    let line = line.trim();
    let comment = line
        .strip_prefix("///")
        .or_else(|| line.strip_prefix("//"))?
        .trim();

    let body = comment
        .strip_prefix(DIRECTIVE_PREFIX)?
        .trim()
        .strip_prefix("allow(")?;
    let (names, rest) = body.split_once(')')?;

    let checks: HashSet<String> = names
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if checks.is_empty() {
        return None;
    }

    let reason = rest
        .trim()
        .strip_prefix("reason=")
        .and_then(|r| r.trim().strip_prefix('"'))
        .and_then(|r| r.split_once('"'))
        .map(|(reason, _)| reason.to_string());

    Some(AllowDirective { checks, reason })
}
