//! Per-directory configuration (schemalint.toml)

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the per-directory config file.
pub const CONFIG_FILE: &str = "schemalint.toml";

const DEFAULT_LINT_WARNING: &str = "bad-charset,bad-engine";
const DEFAULT_LINT_ERROR: &str = "no-pk";
const DEFAULT_ALLOWED_CHARSET: &str = "latin1,utf8mb4";
const DEFAULT_ALLOWED_ENGINE: &str = "innodb";

/// A configuration problem encountered at runtime.
///
/// Config errors abort only the directory (or option resolution) in which
/// they were detected, never a whole walk.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ConfigError(pub String);

impl ConfigError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Raw option values for one directory, as read from `schemalint.toml`.
///
/// All values are optional strings; list-valued options are comma-separated.
/// A directory without its own file inherits everything from its parent,
/// and a file overrides only the keys it sets (see [`DirConfig::merged_over`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DirConfig {
    /// Literal schema names, used only for the ignore-schema check.
    pub schema: Option<String>,

    /// Comma-separated rule names treated as warnings.
    pub lint_warning: Option<String>,

    /// Comma-separated rule names treated as errors.
    pub lint_error: Option<String>,

    /// Comma-separated allow-list of acceptable character sets.
    pub lint_allowed_charset: Option<String>,

    /// Comma-separated allow-list of acceptable storage engines.
    pub lint_allowed_engine: Option<String>,

    /// Regular expression of table names to skip.
    pub ignore_table: Option<String>,

    /// Regular expression matched against literal schema names.
    pub ignore_schema: Option<String>,
}

impl DirConfig {
    /// Parse a config file from TOML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("Unable to read {}: {}", path.display(), e)))?;
        toml::from_str(&contents)
            .map_err(|e| ConfigError::new(format!("Unable to parse {}: {}", path.display(), e)))
    }

    /// Load the config for a directory, or an empty config if the directory
    /// has no `schemalint.toml`.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve this config against a parent's: keys set here win, everything
    /// else is inherited.
    pub fn merged_over(&self, parent: &DirConfig) -> DirConfig {
        DirConfig {
            schema: self.schema.clone().or_else(|| parent.schema.clone()),
            lint_warning: self.lint_warning.clone().or_else(|| parent.lint_warning.clone()),
            lint_error: self.lint_error.clone().or_else(|| parent.lint_error.clone()),
            lint_allowed_charset: self
                .lint_allowed_charset
                .clone()
                .or_else(|| parent.lint_allowed_charset.clone()),
            lint_allowed_engine: self
                .lint_allowed_engine
                .clone()
                .or_else(|| parent.lint_allowed_engine.clone()),
            ignore_table: self.ignore_table.clone().or_else(|| parent.ignore_table.clone()),
            ignore_schema: self.ignore_schema.clone().or_else(|| parent.ignore_schema.clone()),
        }
    }

    /// Rule names configured as warnings.
    pub fn lint_warning(&self) -> Vec<String> {
        split_list(self.lint_warning.as_deref().unwrap_or(DEFAULT_LINT_WARNING))
    }

    /// Rule names configured as errors.
    pub fn lint_error(&self) -> Vec<String> {
        split_list(self.lint_error.as_deref().unwrap_or(DEFAULT_LINT_ERROR))
    }

    /// Acceptable character sets, kept exactly as configured.
    pub fn lint_allowed_charset(&self) -> Vec<String> {
        split_list(
            self.lint_allowed_charset
                .as_deref()
                .unwrap_or(DEFAULT_ALLOWED_CHARSET),
        )
    }

    /// Acceptable storage engines, kept exactly as configured.
    pub fn lint_allowed_engine(&self) -> Vec<String> {
        split_list(
            self.lint_allowed_engine
                .as_deref()
                .unwrap_or(DEFAULT_ALLOWED_ENGINE),
        )
    }

    /// Literal schema names attached to the directory.
    pub fn schema_names(&self) -> Vec<String> {
        split_list(self.schema.as_deref().unwrap_or(""))
    }

    /// Compiled ignore-table pattern, if configured.
    pub fn ignore_table(&self) -> Result<Option<Regex>, ConfigError> {
        compile_pattern("ignore-table", self.ignore_table.as_deref())
    }

    /// Compiled ignore-schema pattern, if configured.
    pub fn ignore_schema(&self) -> Result<Option<Regex>, ConfigError> {
        compile_pattern("ignore-schema", self.ignore_schema.as_deref())
    }
}

fn compile_pattern(option: &str, raw: Option<&str>) -> Result<Option<Regex>, ConfigError> {
    match raw {
        None | Some("") => Ok(None),
        Some(pattern) => Regex::new(pattern).map(Some).map_err(|e| {
            ConfigError::new(format!(
                "Option {} is not a valid regular expression: {}",
                option, e
            ))
        }),
    }
}

/// Split a comma-separated option value, trimming whitespace and dropping
/// empty entries.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_when_unset() {
        let config = DirConfig::default();
        assert_eq!(config.lint_warning(), vec!["bad-charset", "bad-engine"]);
        assert_eq!(config.lint_error(), vec!["no-pk"]);
        assert_eq!(config.lint_allowed_charset(), vec!["latin1", "utf8mb4"]);
        assert_eq!(config.lint_allowed_engine(), vec!["innodb"]);
        assert!(config.schema_names().is_empty());
        assert!(config.ignore_table().unwrap().is_none());
    }

    #[test]
    fn parses_kebab_case_toml() {
        let config: DirConfig = toml::from_str(
            r#"
            schema = "product, analytics"
            lint-error = "no-pk,bad-engine"
            ignore-table = "^_"
            "#,
        )
        .unwrap();
        assert_eq!(config.schema_names(), vec!["product", "analytics"]);
        assert_eq!(config.lint_error(), vec!["no-pk", "bad-engine"]);
        assert!(config.ignore_table().unwrap().unwrap().is_match("_scratch"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let result: Result<DirConfig, _> = toml::from_str("lint-eror = \"no-pk\"");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_pattern_is_config_error() {
        let config = DirConfig {
            ignore_table: Some("[unclosed".to_string()),
            ..DirConfig::default()
        };
        let err = config.ignore_table().unwrap_err();
        assert!(err.0.contains("ignore-table"));
    }

    #[test]
    fn child_overrides_only_keys_it_sets() {
        let parent = DirConfig {
            lint_error: Some("no-pk".to_string()),
            ignore_table: Some("^tmp".to_string()),
            ..DirConfig::default()
        };
        let child = DirConfig {
            lint_error: Some("bad-charset".to_string()),
            ..DirConfig::default()
        };
        let merged = child.merged_over(&parent);
        assert_eq!(merged.lint_error(), vec!["bad-charset"]);
        assert_eq!(merged.ignore_table, Some("^tmp".to_string()));
    }

    #[test]
    fn list_splitting_trims_and_drops_empties() {
        let config = DirConfig {
            lint_allowed_charset: Some(" utf8mb4 , latin1,,".to_string()),
            ..DirConfig::default()
        };
        assert_eq!(config.lint_allowed_charset(), vec!["utf8mb4", "latin1"]);
    }
}
