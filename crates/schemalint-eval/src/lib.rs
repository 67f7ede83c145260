//! schemalint evaluator
//!
//! Owns all SQL interpretation: the [`SchemaEvaluator`] trait plus a
//! sqlparser-backed implementation and a mock for tests. The lint engine
//! consumes evaluations; it never parses SQL itself.

pub mod adapter;
pub mod mock;
pub mod sql;

pub use adapter::{
    Dialect, EvalError, Evaluation, SchemaEvaluator, StatementError, WorkspaceOptions,
};
pub use mock::MockEvaluator;
pub use sql::SqlEvaluator;
