//! schemalint engine - lint policy logic
//!
//! This crate implements the linting core:
//! - Severity and option resolution
//! - The rule detector registry
//! - The per-directory lint executor
//! - The recursive directory walker

pub mod lint;
pub mod options;
pub mod rules;
pub mod walker;

pub use lint::lint_dir;
pub use options::{Options, Severity};
pub use rules::{Detector, Registry};
pub use walker::{lint_walker, DEFAULT_MAX_DEPTH};
