//! Rule detectors and their registry
//!
//! Detectors operate on a per-schema level of granularity, even though the
//! current rules all check individual tables. The extra boilerplate keeps the
//! door open for non-table object types and cross-table rules later.

use crate::options::Options;
use schemalint_core::{Annotation, LogicalSchema, Schema};
use std::collections::BTreeMap;

/// A named pure rule check: (concrete schema, logical schema, options) to
/// zero or more findings. Detectors evaluate every table independently and
/// never short-circuit.
pub type Detector = fn(&Schema, &LogicalSchema, &Options) -> Vec<Annotation>;

/// Mapping from rule name to detector.
///
/// Built once at startup and passed down by the caller; never mutated while
/// linting. Adding a rule is one [`Registry::register`] call.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    detectors: BTreeMap<String, Detector>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in rules: `no-pk`, `bad-charset`, `bad-engine`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("no-pk", no_pk_detector);
        registry.register("bad-charset", bad_charset_detector);
        registry.register("bad-engine", bad_engine_detector);
        registry
    }

    /// Register a detector under a rule name. Names are stored lower-cased.
    pub fn register(&mut self, name: &str, detector: Detector) {
        self.detectors.insert(name.to_lowercase(), detector);
    }

    /// Look up a detector, case-insensitively.
    pub fn get(&self, name: &str) -> Option<Detector> {
        self.detectors.get(&name.to_lowercase()).copied()
    }

    /// Whether a rule name is registered, case-insensitively.
    pub fn contains(&self, name: &str) -> bool {
        self.detectors.contains_key(&name.to_lowercase())
    }

    /// All registered rule names, in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.detectors.keys().map(String::as_str).collect()
    }
}

fn no_pk_detector(schema: &Schema, logical: &LogicalSchema, _opts: &Options) -> Vec<Annotation> {
    let mut results = Vec::new();
    for table in &schema.tables {
        if table.has_primary_key {
            continue;
        }
        let Some(statement) = logical.statement_for(&table.name) else {
            continue;
        };
        results.push(Annotation::new(
            statement.clone(),
            "No primary key",
            format!("Table {} does not define a PRIMARY KEY", table.name),
        ));
    }
    results
}

fn bad_charset_detector(schema: &Schema, logical: &LogicalSchema, opts: &Options) -> Vec<Annotation> {
    let mut results = Vec::new();
    for table in &schema.tables {
        if is_allowed(&table.charset, &opts.allowed_charsets) {
            continue;
        }
        let Some(statement) = logical.statement_for(&table.name) else {
            continue;
        };
        results.push(Annotation::new(
            statement.clone(),
            "Character set not permitted",
            format!(
                "Table {} is using character set {}, which is not in lint-allowed-charset",
                table.name, table.charset
            ),
        ));
    }
    results
}

fn bad_engine_detector(schema: &Schema, logical: &LogicalSchema, opts: &Options) -> Vec<Annotation> {
    let mut results = Vec::new();
    for table in &schema.tables {
        if is_allowed(&table.engine, &opts.allowed_engines) {
            continue;
        }
        let Some(statement) = logical.statement_for(&table.name) else {
            continue;
        };
        results.push(Annotation::new(
            statement.clone(),
            "Storage engine not permitted",
            format!(
                "Table {} is using storage engine {}, which is not in lint-allowed-engine",
                table.name, table.engine
            ),
        ));
    }
    results
}

/// Case-insensitive membership test against an allow-list.
fn is_allowed(value: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|a| a.eq_ignore_ascii_case(value))
}
