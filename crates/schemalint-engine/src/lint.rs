//! Per-directory lint executor

use crate::options::{Options, Severity};
use crate::rules::Registry;
use schemalint_core::{Annotation, Dir, Exception, LintResult};
use schemalint_eval::{SchemaEvaluator, WorkspaceOptions};

/// Lint one directory (no recursion), returning its accumulated result.
///
/// A configuration problem while resolving the ignore patterns or the rule
/// options aborts the whole directory: the returned result holds exactly one
/// exception and nothing else. Evaluation failures for individual logical
/// schemas are recorded and do not stop the remaining schemas.
pub fn lint_dir(
    dir: &Dir,
    evaluator: &dyn SchemaEvaluator,
    registry: &Registry,
    workspace: &WorkspaceOptions,
) -> LintResult {
    let mut result = LintResult::new();

    let ignore_table = match dir.config.ignore_table() {
        Ok(pattern) => pattern,
        Err(err) => return LintResult::bad_config(err),
    };
    let ignore_schema = match dir.config.ignore_schema() {
        Ok(pattern) => pattern,
        Err(err) => return LintResult::bad_config(err),
    };
    let opts = match Options::for_dir(registry, dir) {
        Ok(opts) => opts,
        Err(err) => return LintResult::bad_config(err),
    };

    for logical in &dir.logical_schemas {
        // ignore-schema is handled simplistically: skip the dir entirely if
        // any literal schema name matches the pattern. Names that require an
        // instance to resolve are not interpreted.
        if let Some(pattern) = &ignore_schema {
            let found_ignored_name = dir
                .config
                .schema_names()
                .iter()
                .any(|name| pattern.is_match(name));
            if found_ignored_name {
                result.debug_logs.push(format!(
                    "Skipping schema in {} because ignore-schema='{}'",
                    dir, pattern
                ));
                return result;
            }
        }

        let evaluation = match evaluator.evaluate(logical, workspace) {
            Ok(evaluation) => evaluation,
            Err(err) => {
                result.exceptions.push(Exception::Execution(format!(
                    "Skipping schema in {} due to error: {}",
                    dir, err
                )));
                continue;
            }
        };

        for stmt_err in &evaluation.statement_errors {
            if let Some(pattern) = &ignore_table {
                if pattern.is_match(&stmt_err.table_name) {
                    result.debug_logs.push(format!(
                        "Skipping table {} because ignore-table='{}'",
                        stmt_err.table_name, pattern
                    ));
                    continue;
                }
            }
            result.errors.push(Annotation::new(
                stmt_err.statement.clone(),
                "SQL statement returned an error",
                stmt_err.message.clone(),
            ));
        }

        for (rule_name, severity) in &opts.problem_severity {
            let Some(detector) = registry.get(rule_name) else {
                continue;
            };
            let findings = detector(&evaluation.schema, logical, &opts);
            match severity {
                Severity::Error => result.errors.extend(findings),
                Severity::Warning => result.warnings.extend(findings),
            }
        }

        for table in &evaluation.schema.tables {
            if let Some(pattern) = &ignore_table {
                if pattern.is_match(&table.name) {
                    result.debug_logs.push(format!(
                        "Skipping table {} because ignore-table='{}'",
                        table.name, pattern
                    ));
                    continue;
                }
            }
            let Some(statement) = logical.statement_for(&table.name) else {
                continue;
            };
            let (body, suffix) = statement.split_text_body();
            if table.create_statement != body {
                result.format_notices.push(Annotation::new(
                    statement.clone(),
                    "SQL statement should be reformatted",
                    format!("{}{}", table.create_statement, suffix),
                ));
            }
        }
    }
    result
}
