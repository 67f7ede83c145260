//! Severity and option resolution

use crate::rules::Registry;
use schemalint_core::{ConfigError, Dir};
use std::collections::BTreeMap;
use std::fmt;

/// Severity a rule finding is filed under. Immutable once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// Resolved settings consumed by detectors. Constructed once per directory
/// lint pass, read-only thereafter.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Configured rule names (lower-cased) mapped to their severity.
    pub problem_severity: BTreeMap<String, Severity>,

    /// Acceptable character sets, as configured; compared case-insensitively
    /// at detector time.
    pub allowed_charsets: Vec<String>,

    /// Acceptable storage engines, as configured; compared case-insensitively
    /// at detector time.
    pub allowed_engines: Vec<String>,
}

impl Options {
    /// Resolve options from a directory's configuration, validating every
    /// configured rule name against the registry.
    ///
    /// `lint-error` is resolved after `lint-warning`, so a rule named in both
    /// lists ends up at error severity.
    pub fn for_dir(registry: &Registry, dir: &Dir) -> Result<Options, ConfigError> {
        let mut opts = Options {
            problem_severity: BTreeMap::new(),
            allowed_charsets: dir.config.lint_allowed_charset(),
            allowed_engines: dir.config.lint_allowed_engine(),
        };

        let all_allowed = registry.names().join(", ");
        for name in dir.config.lint_warning() {
            if !registry.contains(&name) {
                return Err(ConfigError::new(format!(
                    "Option lint-warning must be a comma-separated list including these values: {}",
                    all_allowed
                )));
            }
            opts.problem_severity
                .insert(name.to_lowercase(), Severity::Warning);
        }
        for name in dir.config.lint_error() {
            if !registry.contains(&name) {
                return Err(ConfigError::new(format!(
                    "Option lint-error must be a comma-separated list including these values: {}",
                    all_allowed
                )));
            }
            opts.problem_severity
                .insert(name.to_lowercase(), Severity::Error);
        }

        Ok(opts)
    }
}
