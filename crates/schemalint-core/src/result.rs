//! Annotations and the cumulative lint result

use crate::config::ConfigError;
use crate::fs::Statement;

/// One lint finding tied to a specific declared statement.
#[derive(Debug, Clone)]
pub struct Annotation {
    /// The declaration the finding refers to, for location reporting and
    /// rewriting.
    pub statement: Statement,

    /// Line offset of the finding within the statement.
    pub line_offset: usize,

    /// Short summary of the problem.
    pub summary: String,

    /// Full message.
    pub message: String,
}

impl Annotation {
    pub fn new(statement: Statement, summary: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            statement,
            line_offset: 0,
            summary: summary.into(),
            message: message.into(),
        }
    }

    /// Message prefixed with the statement's source location.
    pub fn message_with_location(&self) -> String {
        format!(
            "{}:{}: {}",
            self.statement.file.display(),
            self.statement.line_no + self.line_offset,
            self.message
        )
    }
}

// Two findings coincide when they describe the same problem on the same
// declaration; line offsets are presentation detail.
impl PartialEq for Annotation {
    fn eq(&self, other: &Self) -> bool {
        self.summary == other.summary
            && self.message == other.message
            && self.statement == other.statement
    }
}

/// A failure that is not a rule finding.
#[derive(Debug, thiserror::Error)]
pub enum Exception {
    /// Bad rule name, bad regular expression, or any other problem that
    /// prevented lint from starting on a directory.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A schema could not be evaluated, a subdirectory could not be listed,
    /// or the depth budget was exceeded. Non-fatal; siblings continue.
    #[error("{0}")]
    Execution(String),
}

impl Exception {
    pub fn is_config(&self) -> bool {
        matches!(self, Exception::Config(_))
    }
}

/// Cumulative findings from linting a directory and its subdirectories.
///
/// Each bucket preserves discovery order; merging preserves a
/// parent-then-children order.
#[derive(Debug, Default)]
pub struct LintResult {
    /// Rule findings configured at error severity, plus statement errors.
    pub errors: Vec<Annotation>,

    /// Rule findings configured at warning severity.
    pub warnings: Vec<Annotation>,

    /// Declarations whose text differs from the canonical rendering.
    pub format_notices: Vec<Annotation>,

    /// Free-form traces explaining skipped work.
    pub debug_logs: Vec<String>,

    /// Configuration and execution failures.
    pub exceptions: Vec<Exception>,
}

impl LintResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// A result holding a single configuration exception, used when option
    /// resolution fails before any schema is processed.
    pub fn bad_config(err: ConfigError) -> Self {
        Self {
            exceptions: vec![Exception::Config(err)],
            ..Self::default()
        }
    }

    /// Append every bucket of `other` onto this result, in place. Entries are
    /// never deduplicated or dropped.
    pub fn merge(&mut self, other: LintResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.format_notices.extend(other.format_notices);
        self.debug_logs.extend(other.debug_logs);
        self.exceptions.extend(other.exceptions);
    }

    /// Whether any configuration exception was recorded.
    pub fn has_config_error(&self) -> bool {
        self.exceptions.iter().any(Exception::is_config)
    }

    /// Whether nothing at all was found.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
            && self.warnings.is_empty()
            && self.format_notices.is_empty()
            && self.exceptions.is_empty()
    }
}
