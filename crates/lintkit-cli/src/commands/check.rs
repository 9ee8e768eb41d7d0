//! Check command implementation.

use anyhow::{bail, Context, Result};
use lintkit_core::{Analyzer, CheckLevel, CheckManager, Config, FixitRequest};
use std::path::PathBuf;
use tracing::warn;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Level used when neither the command line nor the config names one.
const DEFAULT_LEVEL: CheckLevel = CheckLevel::Level1;

/// Arguments of `lintkit check`.
#[derive(Debug, Default)]
pub struct CheckArgs {
    /// Directory to analyze.
    pub path: PathBuf,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated check names.
    pub checks: Option<String>,
    /// Level for default check selection.
    pub level: Option<u8>,
    /// Fixit request from `--fixit` or the environment.
    pub fixit: Option<String>,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
    /// Fail on unparsable files.
    pub strict_parse: bool,
}

/// Runs the check command.
///
/// Returns `true` when any error-severity violation was found.
pub fn run(manager: &mut CheckManager, args: &CheckArgs, source: &ConfigSource) -> Result<bool> {
    let mut config = source.load().with_context(|| match source.path() {
        Some(p) => format!("Failed to load config: {}", p.display()),
        None => "Failed to load default config".to_string(),
    })?;

    let request = fixit_request(args.fixit.as_deref(), &config);
    let names = select_checks(manager, args, &config);
    manager.set_fixit_request(request);

    let report = manager.create_checkers(&names);
    if report.created.is_empty() {
        bail!("No checks to run (requested: {})", names.join(", "));
    }
    keep_fixit_owner_enabled(manager, &mut config);

    let analyzer = Analyzer::builder()
        .root(&args.path)
        .config(config)
        .excludes(args.exclude.iter().cloned())
        .fail_on_parse_error(args.strict_parse)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {:?} with {}",
        args.path,
        report.created.join(", ")
    );

    let result = analyzer
        .analyze(manager.created_checks())
        .context("Analysis failed")?;

    super::output::print(&result, args.format, &args.path)?;

    Ok(result.has_errors())
}

/// A requested fixit always runs with its owning check, even when the
/// config file switches that check off.
fn keep_fixit_owner_enabled(manager: &CheckManager, config: &mut Config) {
    let Some(fixit) = manager.fixit_request().requested_name() else {
        return;
    };
    let Some(owner) = manager.check_name_for_fixit(fixit) else {
        return;
    };
    if config.is_check_enabled(owner) {
        return;
    }

    warn!("Check {owner} is disabled in config but owns requested fixit {fixit}; running it anyway");
    config
        .overrides
        .entry(owner.to_string())
        .or_default()
        .enabled = Some(true);
}

/// `--fixit`/`LINTKIT_FIXIT` first, then the config file.
fn fixit_request(cli: Option<&str>, config: &Config) -> FixitRequest {
    match cli {
        Some(value) => FixitRequest::parse(Some(value)),
        None => config.fixit_request(),
    }
}

/// `--checks` first, then the config list, then every visible check up to
/// the requested level.
fn select_checks(manager: &CheckManager, args: &CheckArgs, config: &Config) -> Vec<String> {
    if let Some(list) = &args.checks {
        return list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }

    if let Some(list) = &config.checks {
        return list.clone();
    }

    let level = args
        .level
        .and_then(CheckLevel::from_number)
        .or_else(|| config.check_level())
        .unwrap_or(DEFAULT_LEVEL);
    manager
        .checks_for_level(level)
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn manager() -> CheckManager {
        let mut manager = CheckManager::new();
        lintkit_checks::register_all(&mut manager).expect("register");
        manager
    }

    #[test]
    fn explicit_list_beats_config_and_level() {
        let manager = manager();
        let config = Config::parse("checks = [\"no-sync-io\"]").expect("config");
        let args = CheckArgs {
            checks: Some("no-panic-macros, require-tracing,".to_string()),
            level: Some(3),
            ..CheckArgs::default()
        };
        assert_eq!(
            select_checks(&manager, &args, &config),
            vec!["no-panic-macros", "require-tracing"]
        );

        let args = CheckArgs::default();
        assert_eq!(select_checks(&manager, &args, &config), vec!["no-sync-io"]);
    }

    #[test]
    fn level_falls_back_to_config_then_default() {
        let manager = manager();
        let args = CheckArgs::default();

        assert_eq!(
            select_checks(&manager, &args, &Config::default()),
            vec!["no-unwrap-expect", "require-tracing"]
        );

        let config = Config::parse("level = 0").expect("config");
        assert_eq!(
            select_checks(&manager, &args, &config),
            vec!["no-unwrap-expect"]
        );

        let args = CheckArgs {
            level: Some(2),
            ..CheckArgs::default()
        };
        assert_eq!(select_checks(&manager, &args, &config).len(), 3);
    }

    #[test]
    fn fixit_flag_overrides_config() {
        let config = Config::parse("fixit = \"all_fixits\"").expect("config");
        assert_eq!(fixit_request(None, &config), FixitRequest::All);
        assert_eq!(
            fixit_request(Some("fix-log-to-tracing"), &config),
            FixitRequest::Named("fix-log-to-tracing".to_string())
        );
        assert_eq!(fixit_request(Some(""), &config), FixitRequest::Disabled);
    }

    #[test]
    fn run_reports_errors_and_activates_fixit_owner() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("src")).expect("mkdir");
        fs::write(
            dir.path().join("src/lib.rs"),
            "pub fn f() -> Option<u8> { let v = g().unwrap(); Some(v) }\n",
        )
        .expect("write");

        let mut manager = manager();
        let args = CheckArgs {
            path: dir.path().to_path_buf(),
            format: OutputFormat::Compact,
            checks: Some("no-sync-io".to_string()),
            fixit: Some("fix-unwrap-to-question-mark".to_string()),
            ..CheckArgs::default()
        };

        let has_errors = run(&mut manager, &args, &ConfigSource::Default).expect("run");
        assert!(has_errors);
        let names: Vec<&str> = manager.created_checks().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["no-sync-io", "no-unwrap-expect"]);
    }

    #[test]
    fn fixit_owner_runs_even_when_disabled_in_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("src")).expect("mkdir");
        fs::write(
            dir.path().join("src/lib.rs"),
            "pub fn f() -> Option<u8> { let v = g().unwrap(); Some(v) }\n",
        )
        .expect("write");
        let config_path = dir.path().join("lintkit.toml");
        fs::write(&config_path, "[check.no-unwrap-expect]\nenabled = false\n").expect("write");
        let source = ConfigSource::Explicit(config_path);

        let mut manager = manager();
        let args = CheckArgs {
            path: dir.path().to_path_buf(),
            format: OutputFormat::Compact,
            checks: Some("no-sync-io".to_string()),
            ..CheckArgs::default()
        };
        let has_errors = run(&mut manager, &args, &source).expect("run without fixit");
        assert!(!has_errors, "disabled check stays off without a fixit request");

        let args = CheckArgs {
            fixit: Some("fix-unwrap-to-question-mark".to_string()),
            ..args
        };
        let has_errors = run(&mut manager, &args, &source).expect("run with fixit");
        assert!(has_errors, "fixit owner must run despite the config");
    }

    #[test]
    fn run_without_valid_checks_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut manager = manager();
        let args = CheckArgs {
            path: dir.path().to_path_buf(),
            checks: Some("does-not-exist".to_string()),
            ..CheckArgs::default()
        };
        assert!(run(&mut manager, &args, &ConfigSource::Default).is_err());
    }
}
