//! Mock evaluator for testing
//!
//! Returns a predefined evaluation without touching SQL or a workspace.
//! Useful for unit testing the lint engine's control flow, including the
//! whole-schema failure path.

use crate::adapter::{EvalError, Evaluation, SchemaEvaluator, StatementError, WorkspaceOptions};
use schemalint_core::{LogicalSchema, Table};

/// Evaluator that returns a canned evaluation, or a canned failure.
#[derive(Debug, Clone, Default)]
pub struct MockEvaluator {
    evaluation: Evaluation,
    failure: Option<String>,
}

impl MockEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table to the materialized schema.
    pub fn with_table(mut self, table: Table) -> Self {
        self.evaluation.schema.tables.push(table);
        self
    }

    /// Add a statement error to the evaluation.
    pub fn with_statement_error(mut self, error: StatementError) -> Self {
        self.evaluation.statement_errors.push(error);
        self
    }

    /// Make every `evaluate` call fail with the given message.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }
}

impl SchemaEvaluator for MockEvaluator {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn evaluate(
        &self,
        logical: &LogicalSchema,
        _options: &WorkspaceOptions,
    ) -> Result<Evaluation, EvalError> {
        if let Some(message) = &self.failure {
            return Err(EvalError::Workspace(message.clone()));
        }
        let mut evaluation = self.evaluation.clone();
        evaluation.schema.name = logical.name.clone();
        Ok(evaluation)
    }
}
