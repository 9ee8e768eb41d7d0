//! lintkit CLI tool.
//!
//! Usage:
//! ```bash
//! lintkit check [OPTIONS] [PATH]
//! lintkit list-checks [--all]
//! lintkit list-fixits [CHECK]
//! lintkit init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use lintkit_core::CheckManager;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Pluggable static analysis for Rust sources
#[derive(Parser)]
#[command(name = "lintkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run checks
    Check {
        /// Path to analyze (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run these checks (comma-separated)
        #[arg(long)]
        checks: Option<String>,

        /// Run every visible check up to this level (0-3)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=3))]
        level: Option<u8>,

        /// Fixit to enable, or `all_fixits`
        #[arg(long, env = "LINTKIT_FIXIT")]
        fixit: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Fail when a source file does not parse
        #[arg(long)]
        strict_parse: bool,
    },

    /// List registered checks
    ListChecks {
        /// Include hidden checks
        #[arg(long)]
        all: bool,
    },

    /// List fixits, for one check or all of them
    ListFixits {
        /// Check whose fixits to list
        check: Option<String>,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
    /// Source snippets with labels, rendered by miette.
    Rich,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut manager = CheckManager::new();
    lintkit_checks::register_all(&mut manager)?;

    match cli.command {
        Commands::Check {
            path,
            format,
            checks,
            level,
            fixit,
            exclude,
            strict_parse,
        } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            let args = commands::check::CheckArgs {
                path,
                format,
                checks,
                level,
                fixit,
                exclude,
                strict_parse,
            };
            if commands::check::run(&mut manager, &args, &source)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::ListChecks { all } => {
            print!("{}", commands::list_checks::render(&manager, all));
            Ok(())
        }
        Commands::ListFixits { check } => {
            print!(
                "{}",
                commands::list_fixits::render(&manager, check.as_deref())?
            );
            Ok(())
        }
        Commands::Init { force } => commands::init::run(Path::new("."), force),
    }
}
