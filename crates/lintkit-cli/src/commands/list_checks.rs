//! List checks command implementation.

use lintkit_core::CheckManager;
use std::fmt::Write;

/// Renders the registered checks in registration order.
#[must_use]
pub fn render(manager: &CheckManager, include_hidden: bool) -> String {
    let mut out = String::from("Available checks:\n\n");
    let _ = writeln!(out, "{:<20} {:<8} {:<7} Description", "Name", "Level", "Fixits");
    let _ = writeln!(out, "{}", "-".repeat(72));

    let visible = manager.available_check_names(include_hidden);
    for rc in manager
        .registry()
        .iter()
        .filter(|rc| visible.contains(&rc.name()))
    {
        let description = rc.create().description();
        let level = if rc.flags().is_hidden() {
            format!("{}*", rc.flags().level())
        } else {
            rc.flags().level().to_string()
        };
        let _ = writeln!(
            out,
            "{:<20} {:<8} {:<7} {}",
            rc.name(),
            level,
            manager.available_fixits(rc.name()).len(),
            description
        );
    }

    if include_hidden {
        out.push_str("\n* hidden: only runs when named with --checks\n");
    }
    out.push_str("\nUse --checks or --level to choose checks, e.g.:\n");
    out.push_str("  lintkit check --checks no-unwrap-expect,no-sync-io\n");
    out.push_str("  lintkit check --level 2\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> CheckManager {
        let mut manager = CheckManager::new();
        lintkit_checks::register_all(&mut manager).expect("register");
        manager
    }

    #[test]
    fn hides_hidden_checks_by_default() {
        let text = render(&manager(), false);
        assert!(text.contains("no-unwrap-expect"));
        assert!(!text.contains("no-panic-macros"));
        assert!(!text.contains("* hidden"));
    }

    #[test]
    fn lists_everything_with_all() {
        let text = render(&manager(), true);
        let rows = text
            .lines()
            .skip(4)
            .take(4)
            .map(|l| l.split_whitespace().take(3).collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>()
            .join("\n");

        insta::assert_snapshot!(rows, @r"
        no-unwrap-expect level0 2
        require-tracing level1 1
        no-sync-io level2 0
        no-panic-macros level3* 0
        ");
        assert!(text.contains("* hidden"));
    }
}
