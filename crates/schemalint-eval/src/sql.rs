//! sqlparser-backed schema evaluator
//!
//! Parses each declared CREATE TABLE statement and materializes the table
//! model from the AST: primary key presence, character set, storage engine,
//! and the parser's canonical rendering of the statement.

use crate::adapter::{
    Dialect, EvalError, Evaluation, SchemaEvaluator, StatementError, WorkspaceOptions,
};
use schemalint_core::{LogicalSchema, Schema, Table};
use sqlparser::ast::{ColumnOption, CreateTable, Statement as SqlStatement, TableConstraint};
use sqlparser::dialect::{GenericDialect, MySqlDialect};
use sqlparser::parser::Parser;

/// Evaluator that materializes schemas by parsing declarations locally,
/// standing in for a live database workspace.
///
/// Tables that do not declare a character set or storage engine fall back to
/// the workspace defaults, the way a server-side evaluation would inherit
/// server defaults.
#[derive(Debug, Clone)]
pub struct SqlEvaluator {
    default_charset: String,
    default_engine: String,
}

impl Default for SqlEvaluator {
    fn default() -> Self {
        Self {
            default_charset: "utf8mb4".to_string(),
            default_engine: "InnoDB".to_string(),
        }
    }
}

impl SqlEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the charset applied to tables that declare none.
    pub fn with_default_charset(mut self, charset: impl Into<String>) -> Self {
        self.default_charset = charset.into();
        self
    }

    /// Override the engine applied to tables that declare none.
    pub fn with_default_engine(mut self, engine: impl Into<String>) -> Self {
        self.default_engine = engine.into();
        self
    }

    fn parse(&self, sql: &str, dialect: Dialect) -> Result<Vec<SqlStatement>, String> {
        let result = match dialect {
            Dialect::MySql => Parser::parse_sql(&MySqlDialect {}, sql),
            Dialect::Generic => Parser::parse_sql(&GenericDialect {}, sql),
        };
        result.map_err(|e| e.to_string())
    }

    fn materialize(&self, declared_name: &str, table: &CreateTable) -> Table {
        let name = table
            .name
            .0
            .last()
            .map(|ident| ident.value.clone())
            .unwrap_or_else(|| declared_name.to_string());

        let column_pk = table.columns.iter().any(|col| {
            col.options.iter().any(|def| {
                matches!(
                    def.option,
                    ColumnOption::Unique {
                        is_primary: true,
                        ..
                    }
                )
            })
        });
        let constraint_pk = table
            .constraints
            .iter()
            .any(|c| matches!(c, TableConstraint::PrimaryKey { .. }));

        let charset = table
            .default_charset
            .clone()
            .unwrap_or_else(|| self.default_charset.clone());
        let engine = table
            .engine
            .as_ref()
            .map(|e| e.name.clone())
            .unwrap_or_else(|| self.default_engine.clone());

        Table {
            name,
            has_primary_key: column_pk || constraint_pk,
            charset,
            engine,
            create_statement: table.to_string(),
        }
    }
}

impl SchemaEvaluator for SqlEvaluator {
    fn name(&self) -> &'static str {
        "sql"
    }

    fn evaluate(
        &self,
        logical: &LogicalSchema,
        options: &WorkspaceOptions,
    ) -> Result<Evaluation, EvalError> {
        let mut schema = Schema {
            name: logical.name.clone(),
            tables: Vec::new(),
        };
        let mut statement_errors = Vec::new();

        for (table_name, statement) in &logical.create_tables {
            let parsed = match self.parse(&statement.text, options.dialect) {
                Ok(parsed) => parsed,
                Err(message) => {
                    statement_errors.push(StatementError {
                        statement: statement.clone(),
                        table_name: table_name.clone(),
                        message,
                    });
                    continue;
                }
            };
            match parsed.iter().find_map(|s| match s {
                SqlStatement::CreateTable(ct) => Some(ct),
                _ => None,
            }) {
                Some(ct) => schema.tables.push(self.materialize(table_name, ct)),
                None => statement_errors.push(StatementError {
                    statement: statement.clone(),
                    table_name: table_name.clone(),
                    message: "statement is not CREATE TABLE".to_string(),
                }),
            }
        }

        Ok(Evaluation {
            schema,
            statement_errors,
        })
    }
}
