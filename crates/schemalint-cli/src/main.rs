//! schemalint binary
//!
//! Walks a directory tree of schema declarations, reports lint findings, and
//! rewrites declarations whose text drifted from the canonical rendering.

use clap::Parser;
use colored::Colorize;
use schemalint_core::{Dir, Exception, LintResult};
use schemalint_engine::{lint_walker, Registry, DEFAULT_MAX_DEPTH};
use schemalint_eval::{Dialect, SchemaEvaluator, SqlEvaluator, WorkspaceOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const CODE_DIFFERENCES_FOUND: u8 = 1;
const CODE_FATAL_ERROR: u8 = 2;
const CODE_BAD_CONFIG: u8 = 78;

/// Verify schema declaration files and reformat them in a standardized way
///
/// Lints every *.sql CREATE TABLE declaration under the given directory,
/// recursing through subdirectories. Declarations whose text differs from the
/// canonical rendering are rewritten in place unless --check is given.
///
/// Exit status: 0 if nothing was found, 1 if only warnings or format
/// differences were found, 2 if errors or fatal exceptions occurred, 78 for a
/// configuration problem.
#[derive(Debug, Parser)]
#[command(name = "schemalint", version, about)]
struct Cli {
    /// Directory to lint (defaults to the current directory)
    path: Option<PathBuf>,

    /// Maximum subdirectory depth to recurse into
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Report format drift without rewriting declaration files
    #[arg(long)]
    check: bool,

    /// Interpret declarations as generic ANSI SQL instead of MySQL
    #[arg(long)]
    ansi: bool,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let path = cli.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let dir = match Dir::parse(&path) {
        Ok(dir) => dir,
        Err(err) => {
            error!("{}", err);
            return ExitCode::from(CODE_BAD_CONFIG);
        }
    };

    let registry = Registry::builtin();
    let evaluator = SqlEvaluator::new();
    let workspace = WorkspaceOptions {
        dialect: if cli.ansi {
            Dialect::Generic
        } else {
            Dialect::MySql
        },
    };

    debug!("Evaluating schemas with the {} evaluator", evaluator.name());
    let mut result = lint_walker(&dir, &evaluator, &registry, &workspace, cli.max_depth);
    report(&mut result, cli.check);
    summarize(&result);
    ExitCode::from(exit_code(&result))
}

/// Log every bucket of the result and apply format notices by rewriting the
/// affected declarations. Rewrite failures are appended to the result's
/// exceptions so they count toward the exit status.
fn report(result: &mut LintResult, check_only: bool) {
    for exc in &result.exceptions {
        error!("{}", exc);
    }
    for annotation in &result.errors {
        error!("{}", annotation.message_with_location());
    }
    for annotation in &result.warnings {
        warn!("{}", annotation.message_with_location());
    }

    let mut rewrite_failures = Vec::new();
    for notice in &result.format_notices {
        if check_only {
            info!(
                "{} should be reformatted to match canonical format",
                notice.statement.location()
            );
            continue;
        }
        match notice.statement.rewrite(&notice.message) {
            Ok(length) => info!(
                "Wrote {} ({} bytes) -- updated file to normalize format",
                notice.statement.file.display(),
                length
            ),
            Err(err) => {
                let message = format!(
                    "Unable to write to {}: {}",
                    notice.statement.file.display(),
                    err
                );
                error!("{}", message);
                rewrite_failures.push(Exception::Execution(message));
            }
        }
    }
    result.exceptions.extend(rewrite_failures);

    for trace in &result.debug_logs {
        debug!("{}", trace);
    }
}

fn summarize(result: &LintResult) {
    if !result.exceptions.is_empty() {
        eprintln!(
            "{}",
            format!(
                "Skipped {} operations due to fatal errors",
                result.exceptions.len()
            )
            .red()
        );
    } else if !result.errors.is_empty() {
        eprintln!("{}", format!("Found {} errors", result.errors.len()).red());
    } else if !result.warnings.is_empty() {
        eprintln!(
            "{}",
            format!("Found {} warnings", result.warnings.len()).yellow()
        );
    } else if result.format_notices.is_empty() {
        eprintln!("{}", "No problems found".green());
    }
}

/// Map a result's bucket population onto the process exit status.
fn exit_code(result: &LintResult) -> u8 {
    if result.has_config_error() {
        CODE_BAD_CONFIG
    } else if !result.exceptions.is_empty() || !result.errors.is_empty() {
        CODE_FATAL_ERROR
    } else if !result.warnings.is_empty() || !result.format_notices.is_empty() {
        CODE_DIFFERENCES_FOUND
    } else {
        0
    }
}
