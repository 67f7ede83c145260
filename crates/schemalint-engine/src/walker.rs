//! Recursive directory walker

use crate::lint::lint_dir;
use crate::rules::Registry;
use schemalint_core::{Dir, Exception, LintResult};
use schemalint_eval::{SchemaEvaluator, WorkspaceOptions};
use tracing::{info, warn};

/// Default depth bound applied by callers that do not configure one.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Lint a directory and all eligible subdirectories, merging child results
/// into the parent's in listing order.
///
/// The current directory is always linted, regardless of the remaining depth
/// budget. Traversal failures (unlistable subdirectories, the depth budget
/// running out, subdirectories excluded for their own configuration errors)
/// are recorded as non-fatal exceptions; nothing is thrown past this
/// boundary.
pub fn lint_walker(
    dir: &Dir,
    evaluator: &dyn SchemaEvaluator,
    registry: &Registry,
    workspace: &WorkspaceOptions,
    max_depth: usize,
) -> LintResult {
    info!("Linting {}", dir);
    if dir.ignored_statements > 0 {
        warn!(
            "Ignoring {} non-CREATE TABLE statements found in this directory's *.sql files",
            dir.ignored_statements
        );
    }

    let mut result = lint_dir(dir, evaluator, registry, workspace);

    match dir.subdirs() {
        Err(err) => {
            result.exceptions.push(Exception::Execution(format!(
                "Cannot list subdirs of {}: {}",
                dir, err
            )));
        }
        Ok((subdirs, bad_count)) => {
            if !subdirs.is_empty() && max_depth == 0 {
                result.exceptions.push(Exception::Execution(format!(
                    "Not walking subdirs of {}: max depth reached",
                    dir
                )));
            } else {
                if bad_count > 0 {
                    result.exceptions.push(Exception::Execution(format!(
                        "Ignoring {} subdirs of {} with configuration errors",
                        bad_count, dir
                    )));
                }
                for sub in subdirs {
                    result.merge(lint_walker(
                        &sub,
                        evaluator,
                        registry,
                        workspace,
                        max_depth.saturating_sub(1),
                    ));
                }
            }
        }
    }
    result
}
