//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "lintkit.toml";

const DEFAULT_CONFIG: &str = r#"# lintkit configuration

# Checks up to this level run when no explicit list is given (0-3)
level = 1

# Explicit list of checks, overrides `level`
# checks = ["no-unwrap-expect", "require-tracing"]

# Fixit to enable, or "all_fixits". LINTKIT_FIXIT and --fixit take precedence.
# fixit = "fix-log-to-tracing"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/target/**",
    "**/vendor/**",
    "**/generated/**",
]

# Per-check overrides
[check.no-unwrap-expect]
enabled = true
# severity = "warning"

# [check.no-sync-io]
# enabled = false
"#;

/// Writes a starter `lintkit.toml` into `dir`.
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to choose checks");
    println!("  2. Run: lintkit check");

    Ok(())
}
