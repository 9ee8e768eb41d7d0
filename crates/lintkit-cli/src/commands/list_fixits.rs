//! List fixits command implementation.

use anyhow::{bail, Result};
use lintkit_core::{CheckManager, ALL_FIXITS, FIXIT_ENV_VAR};
use std::fmt::Write;

/// Renders the fixits of `check`, or of every check when `None`.
///
/// # Errors
///
/// Returns an error if `check` names no registered check.
pub fn render(manager: &CheckManager, check: Option<&str>) -> Result<String> {
    let names = match check {
        Some(name) if !manager.registry().contains(name) => bail!("Unknown check: {name}"),
        Some(name) => vec![name],
        None => manager.available_check_names(true),
    };

    let mut out = String::new();
    for name in names {
        let fixits = manager.available_fixits(name);
        if fixits.is_empty() {
            if check.is_some() {
                let _ = writeln!(out, "{name}: no fixits");
            }
            continue;
        }
        let _ = writeln!(out, "{name}:");
        for fixit in fixits {
            let _ = writeln!(out, "  {:<32} {}", fixit.name, fixit.id);
        }
    }

    let _ = write!(
        out,
        "\nEnable one with --fixit NAME or {FIXIT_ENV_VAR}=NAME; `{ALL_FIXITS}` enables all.\n"
    );
    Ok(out)
}
