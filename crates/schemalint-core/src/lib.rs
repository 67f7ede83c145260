//! schemalint core
//!
//! Stable domain types shared by the evaluator, the lint engine, and the CLI:
//! per-directory configuration, the filesystem model of declared statements,
//! the concrete schema model, and the lint result taxonomy.

pub mod config;
pub mod fs;
pub mod result;
pub mod schema;

pub use config::{ConfigError, DirConfig, CONFIG_FILE};
pub use fs::{Dir, LogicalSchema, Statement};
pub use result::{Annotation, Exception, LintResult};
pub use schema::{Schema, Table};
