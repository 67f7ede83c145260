//! Schema evaluator trait
//!
//! An evaluator materializes a logical schema (raw CREATE TABLE text) into
//! the concrete schema model, reporting per-statement failures separately
//! from whole-schema failures. Evaluation is synchronous: an evaluator may
//! own an ephemeral workspace whose identity is not safe to share across
//! concurrent evaluations.

use schemalint_core::{LogicalSchema, Schema, Statement};
use std::fmt;

/// SQL dialect used to interpret declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// MySQL / MariaDB syntax, including ENGINE and DEFAULT CHARSET options.
    #[default]
    MySql,

    /// Generic ANSI SQL.
    Generic,
}

/// Settings for the evaluation workspace.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceOptions {
    /// Dialect declarations are written in.
    pub dialect: Dialect,
}

/// A statement that failed during evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementError {
    /// The declaration that failed.
    pub statement: Statement,

    /// Name of the affected table.
    pub table_name: String,

    /// What went wrong.
    pub message: String,
}

impl fmt::Display for StatementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.statement.location(), self.message)
    }
}

/// The outcome of evaluating one logical schema.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    /// The materialized schema. Tables whose statements failed are absent.
    pub schema: Schema,

    /// Per-statement failures, in evaluation order.
    pub statement_errors: Vec<StatementError>,
}

/// A whole-schema evaluation failure, as opposed to a per-statement one.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("workspace unavailable: {0}")]
    Workspace(String),
}

/// Materializes logical schemas into concrete ones.
pub trait SchemaEvaluator {
    /// Evaluator name, for logging.
    fn name(&self) -> &'static str;

    /// Evaluate a logical schema. Individual statement failures are reported
    /// inside the `Evaluation`; an `Err` means the whole schema could not be
    /// evaluated.
    fn evaluate(
        &self,
        logical: &LogicalSchema,
        options: &WorkspaceOptions,
    ) -> Result<Evaluation, EvalError>;
}
