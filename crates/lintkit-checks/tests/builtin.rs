//! The built-in set as seen through the manager.

use lintkit_core::{CheckLevel, CheckManager, FileContext, FixitRequest, Violation};
use std::path::Path;

fn manager(request: FixitRequest) -> CheckManager {
    let mut manager = CheckManager::new().with_fixit_request(request);
    lintkit_checks::register_all(&mut manager).expect("register built-ins");
    manager
}

fn listing(manager: &CheckManager) -> String {
    manager
        .registry()
        .iter()
        .map(|rc| {
            let fixits: Vec<String> = manager
                .available_fixits(rc.name())
                .iter()
                .map(|f| format!("{} ({})", f.name, f.id))
                .collect();
            format!(
                "{} {}{} [{}]",
                rc.name(),
                rc.flags().level(),
                if rc.flags().is_hidden() { " hidden" } else { "" },
                fixits.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn run(manager: &CheckManager, code: &str) -> Vec<Violation> {
    let ast = syn::parse_file(code).expect("valid source");
    let ctx = FileContext::new(Path::new("src/lib.rs"), code, Path::new(""));
    manager
        .created_checks()
        .iter()
        .flat_map(|check| check.check(&ctx, &ast))
        .collect()
}

const SOURCE: &str = r#"
use log::info;

pub fn load(path: &str) -> Result<String, Error> {
    let text = read(path).unwrap();
    log::warn!("loaded");
    Ok(text)
}
"#;

#[test]
fn listing_of_builtin_checks() {
    let manager = manager(FixitRequest::Disabled);
    insta::assert_snapshot!(listing(&manager), @r"
    no-unwrap-expect level0 [fix-unwrap-to-question-mark (0x1), fix-expect-to-question-mark (0x2)]
    require-tracing level1 [fix-log-to-tracing (0x1)]
    no-sync-io level2 []
    no-panic-macros level3 hidden []
    ");
}

#[test]
fn levels_select_visible_checks() {
    let manager = manager(FixitRequest::Disabled);
    assert_eq!(
        manager.checks_for_level(CheckLevel::Level1),
        vec!["no-unwrap-expect", "require-tracing"]
    );
    assert_eq!(
        manager.checks_for_level(CheckLevel::Level3),
        vec!["no-unwrap-expect", "require-tracing", "no-sync-io"]
    );
    assert_eq!(manager.available_check_names(false).len(), 3);
    assert_eq!(manager.available_check_names(true).len(), 4);
}

#[test]
fn fixit_request_activates_owner() {
    let mut manager = manager(FixitRequest::Named("fix-log-to-tracing".to_string()));
    let report = manager.create_checkers(&["no-unwrap-expect"]);

    assert_eq!(report.created, vec!["no-unwrap-expect", "require-tracing"]);
    assert_eq!(report.implicit_check.as_deref(), Some("require-tracing"));

    let violations = run(&manager, SOURCE);
    let fixable: Vec<_> = violations
        .iter()
        .filter(|v| v.is_fixable())
        .map(|v| v.check.as_str())
        .collect();
    assert_eq!(fixable, vec!["require-tracing", "require-tracing"]);
    assert_eq!(violations.len(), 3);
}

#[test]
fn all_fixits_enable_every_fixit_of_requested_checks() {
    let mut manager = manager(FixitRequest::All);
    manager.create_checkers(&["no-unwrap-expect", "require-tracing", "no-sync-io"]);

    let enabled: Vec<u32> = manager
        .created_checks()
        .iter()
        .map(|c| c.enabled_fixits().bits())
        .collect();
    assert_eq!(enabled, vec![0x3, 0x1, 0x0]);

    let violations = run(&manager, SOURCE);
    assert_eq!(violations.len(), 3);
    assert!(violations.iter().all(Violation::is_fixable));
}
