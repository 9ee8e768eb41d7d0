//! Driver that runs activated checks over a source tree.

use crate::check::CheckBox;
use crate::config::Config;
use crate::context::FileContext;
use crate::types::{LintResult, Violation};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing Rust source file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Debug, Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be resolved.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let root = self
            .root
            .or_else(|| self.config.as_ref().map(|c| c.analyzer.root.clone()))
            .unwrap_or_else(|| PathBuf::from("."));

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        if let Some(ref config) = self.config {
            exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        }
        if exclude_patterns.is_empty() {
            exclude_patterns.extend(["**/target/**".to_string(), "**/vendor/**".to_string()]);
        }

        Ok(Analyzer {
            root,
            exclude_patterns,
            config: self.config.unwrap_or_default(),
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// Runs a set of already-activated checks over every Rust file below a root.
///
/// The analyzer does not choose checks. It receives whatever
/// [`CheckManager::create_checkers`](crate::CheckManager::create_checkers)
/// produced and only consults the config for per-check overrides.
#[derive(Debug)]
pub struct Analyzer {
    root: PathBuf,
    exclude_patterns: Vec<String>,
    config: Config,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Runs `checks` over all discovered files.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, or if a file fails to parse
    /// and the analyzer was built with `fail_on_parse_error`.
    pub fn analyze(&self, checks: &[CheckBox]) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let active: Vec<&CheckBox> = checks
            .iter()
            .filter(|c| {
                let enabled = self.config.is_check_enabled(c.name());
                if !enabled {
                    debug!("Skipping disabled check: {}", c.name());
                }
                enabled
            })
            .collect();

        let mut result = LintResult::new();
        result.checks = active.iter().map(|c| c.name().to_string()).collect();

        let files = self.discover_files()?;
        info!(
            "Found {} files to analyze with {} checks",
            files.len(),
            active.len()
        );

        for file_path in &files {
            match self.analyze_file(file_path, &active) {
                Ok(violations) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                }
                Err(AnalyzerError::Parse { path, message }) => {
                    warn!("Failed to parse {}: {}", path.display(), message);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse { path, message });
                    }
                }
                Err(e) => return Err(e),
            }
        }

        result.violations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    fn analyze_file(
        &self,
        path: &Path,
        checks: &[&CheckBox],
    ) -> Result<Vec<Violation>, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let ast = syn::parse_file(&content).map_err(|e| AnalyzerError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let ctx = FileContext::new(path, &content, &self.root);
        let mut violations = Vec::new();

        for check in checks {
            let found = check.check(&ctx, &ast);
            violations.extend(self.apply_severity_override(check.name(), found));
        }

        Ok(violations)
    }

    fn apply_severity_override(
        &self,
        check_name: &str,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.check_severity(check_name) {
            for v in &mut violations {
                v.severity = severity;
            }
        }
        violations
    }

    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let pattern = format!("{}/**/*.rs", self.root.display());
        let mut files = Vec::new();

        for entry in glob::glob(&pattern)? {
            let path = entry.map_err(|e| AnalyzerError::Io(e.into()))?;

            if self.should_exclude(&path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path);
        }

        Ok(files)
    }

    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        self.exclude_patterns.iter().any(|pattern| {
            if glob::Pattern::new(pattern).is_ok_and(|p| p.matches(&path_str)) {
                return true;
            }
            // "**/target/**" also matches as a plain "/target/" substring
            let bare = pattern.replace("**", "");
            !bare.is_empty() && path_str.contains(&bare)
        })
    }
}
