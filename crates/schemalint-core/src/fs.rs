//! Filesystem model: directories of *.sql declaration files
//!
//! This module owns no SQL semantics. It locates CREATE TABLE declarations in
//! a directory's *.sql files (statement boundaries and table names only) and
//! exposes them as raw text for the evaluator and the lint engine.

use crate::config::{ConfigError, DirConfig};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// One declared SQL statement, tied to its location in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// File containing the statement.
    pub file: PathBuf,

    /// 1-based line number of the statement's first line.
    pub line_no: usize,

    /// Raw statement text, including the trailing delimiter and newline.
    pub text: String,
}

impl Statement {
    /// Split the raw text into its body and trailing formatting noise
    /// (whitespace and the statement delimiter).
    pub fn split_text_body(&self) -> (&str, &str) {
        let body = self
            .text
            .trim_end_matches(|c: char| c == ';' || c.is_whitespace());
        (body, &self.text[body.len()..])
    }

    /// Location string for reporting, `file:line`.
    pub fn location(&self) -> String {
        format!("{}:{}", self.file.display(), self.line_no)
    }

    /// Overwrite this statement in its source file with `new_text`, returning
    /// the new size of the file in bytes.
    ///
    /// Only the first occurrence of the original text is replaced, so a
    /// rewrite applied to an already-updated file fails instead of clobbering
    /// unrelated statements.
    pub fn rewrite(&self, new_text: &str) -> io::Result<usize> {
        let contents = std::fs::read_to_string(&self.file)?;
        if !contents.contains(&self.text) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("statement no longer present in {}", self.file.display()),
            ));
        }
        let updated = contents.replacen(&self.text, new_text, 1);
        std::fs::write(&self.file, &updated)?;
        Ok(updated.len())
    }
}

/// The as-declared form of one schema: raw CREATE TABLE text per table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicalSchema {
    /// Schema name, when one is attached to the directory.
    pub name: Option<String>,

    /// Declared CREATE TABLE statements, keyed by table name.
    pub create_tables: BTreeMap<String, Statement>,
}

impl LogicalSchema {
    /// Look up the declaration for a table.
    pub fn statement_for(&self, table: &str) -> Option<&Statement> {
        self.create_tables.get(table)
    }

    pub fn is_empty(&self) -> bool {
        self.create_tables.is_empty()
    }
}

/// A directory holding schema declarations plus its resolved configuration.
#[derive(Debug, Clone)]
pub struct Dir {
    /// Directory path as given (root) or discovered (subdirs).
    pub path: PathBuf,

    /// Resolved configuration, with parent values inherited.
    pub config: DirConfig,

    /// Logical schemas declared in this directory.
    pub logical_schemas: Vec<LogicalSchema>,

    /// Count of statements in *.sql files that were not CREATE TABLE.
    pub ignored_statements: usize,
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl Dir {
    /// Parse a root directory: load its config and its *.sql declarations.
    pub fn parse(path: impl AsRef<Path>) -> Result<Dir, ConfigError> {
        Self::parse_with_parent(path.as_ref(), None)
    }

    fn parse_with_parent(path: &Path, parent: Option<&DirConfig>) -> Result<Dir, ConfigError> {
        let own = DirConfig::load(path)?;
        let config = match parent {
            Some(parent) => own.merged_over(parent),
            None => own,
        };

        let mut create_tables = BTreeMap::new();
        let mut ignored_statements = 0;
        for file in sql_files(path)
            .map_err(|e| ConfigError::new(format!("Unable to list {}: {}", path.display(), e)))?
        {
            let contents = std::fs::read_to_string(&file).map_err(|e| {
                ConfigError::new(format!("Unable to read {}: {}", file.display(), e))
            })?;
            for (line_no, text) in split_statements(&contents) {
                match table_name(&text) {
                    Some(name) => {
                        create_tables.insert(
                            name,
                            Statement {
                                file: file.clone(),
                                line_no,
                                text,
                            },
                        );
                    }
                    None => ignored_statements += 1,
                }
            }
        }

        let logical_schemas = if create_tables.is_empty() {
            Vec::new()
        } else {
            vec![LogicalSchema {
                name: config.schema_names().into_iter().next(),
                create_tables,
            }]
        };

        Ok(Dir {
            path: path.to_path_buf(),
            config,
            logical_schemas,
            ignored_statements,
        })
    }

    /// List subdirectories in name order, parsing each one's config.
    ///
    /// Returns the successfully parsed subdirectories plus a count of the
    /// ones excluded because their own configuration failed to parse.
    pub fn subdirs(&self) -> io::Result<(Vec<Dir>, usize)> {
        let mut entries: Vec<_> = std::fs::read_dir(&self.path)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|e| e.path().is_dir())
            .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
            .collect();
        entries.sort_by_key(|e| e.file_name());

        let mut subdirs = Vec::new();
        let mut bad_count = 0;
        for entry in entries {
            match Dir::parse_with_parent(&entry.path(), Some(&self.config)) {
                Ok(dir) => subdirs.push(dir),
                Err(_) => bad_count += 1,
            }
        }
        Ok((subdirs, bad_count))
    }
}

fn sql_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "sql"))
        .collect();
    files.sort();
    Ok(files)
}

/// Split file contents into delimiter-terminated statements, tracking the
/// 1-based line each statement starts on. Quoted regions (single, double, and
/// backtick quoting) and comments (`-- line` and `/* block */`) may contain
/// the delimiter.
fn split_statements(contents: &str) -> Vec<(usize, String)> {
    let mut statements = Vec::new();
    let bytes = contents.as_bytes();
    let mut start = 0;
    let mut line = 1;
    let mut start_line = 1;
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c == b'\n' {
            line += 1;
        }
        match quote {
            Some(q) => {
                if c == b'\\' && q != b'`' {
                    i += 1; // skip escaped character
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                b'\'' | b'"' | b'`' => quote = Some(c),
                b'-' if bytes.get(i + 1) == Some(&b'-') => {
                    // line comment runs to end of line; the newline itself is
                    // handled by the next iteration
                    i += 2;
                    while i < bytes.len() && bytes[i] != b'\n' {
                        i += 1;
                    }
                    continue;
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    i += 2;
                    while i < bytes.len() {
                        if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                            i += 2;
                            break;
                        }
                        if bytes[i] == b'\n' {
                            line += 1;
                        }
                        i += 1;
                    }
                    continue;
                }
                b';' => {
                    // include the delimiter and the newline that follows it
                    let mut end = i + 1;
                    if bytes.get(end) == Some(&b'\r') {
                        end += 1;
                    }
                    if bytes.get(end) == Some(&b'\n') {
                        end += 1;
                        line += 1;
                    }
                    push_statement(&mut statements, contents, start, end, start_line);
                    start = end;
                    start_line = line;
                    i = end;
                    continue;
                }
                _ => {}
            },
        }
        i += 1;
    }
    push_statement(&mut statements, contents, start, bytes.len(), start_line);
    statements
}

fn push_statement(
    statements: &mut Vec<(usize, String)>,
    contents: &str,
    start: usize,
    end: usize,
    mut line_no: usize,
) {
    // skip leading blank space and leading comments, keeping the line number
    // pointing at the statement itself; comments stay in the file but are not
    // part of the statement text
    let mut text = &contents[start..end];
    loop {
        let trimmed = text.trim_start();
        line_no += text[..text.len() - trimmed.len()].matches('\n').count();
        text = trimmed;
        if let Some(rest) = text.strip_prefix("--") {
            text = match rest.find('\n') {
                Some(pos) => &rest[pos..],
                None => "",
            };
        } else if let Some(rest) = text.strip_prefix("/*") {
            text = match rest.find("*/") {
                Some(pos) => {
                    line_no += rest[..pos].matches('\n').count();
                    &rest[pos + 2..]
                }
                None => "",
            };
        } else {
            break;
        }
    }
    if !text.trim().is_empty() {
        statements.push((line_no, text.to_string()));
    }
}

/// Extract the table name from a CREATE TABLE statement, or None if the
/// statement is something else entirely.
fn table_name(statement: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(
            r#"(?is)^\s*CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:`([^`]+)`|"([^"]+)"|([A-Za-z0-9_$]+))"#,
        )
        .expect("static pattern compiles")
    });
    let caps = re.captures(statement)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn split_text_body_strips_trailing_noise() {
        let stmt = Statement {
            file: PathBuf::from("users.sql"),
            line_no: 1,
            text: "CREATE TABLE users (id int)  ;\n".to_string(),
        };
        let (body, suffix) = stmt.split_text_body();
        assert_eq!(body, "CREATE TABLE users (id int)");
        assert_eq!(suffix, "  ;\n");
    }

    #[test]
    fn statements_split_on_unquoted_delimiter_only() {
        let statements = split_statements(
            "CREATE TABLE a (c varchar(10) DEFAULT 'x;y');\nCREATE TABLE b (id int);\n",
        );
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].0, 1);
        assert!(statements[0].1.contains("'x;y'"));
        assert_eq!(statements[1].0, 2);
    }

    #[test]
    fn comments_do_not_terminate_statements() {
        let statements = split_statements(
            "-- temporary tables; cleanup later\nCREATE TABLE users (id int PRIMARY KEY);\n/* block; comment */\nCREATE TABLE posts (id int);\n",
        );
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].0, 2);
        assert!(statements[0].1.starts_with("CREATE TABLE users"));
        assert_eq!(statements[1].0, 4);
        assert!(statements[1].1.starts_with("CREATE TABLE posts"));
    }

    #[test]
    fn leading_comment_does_not_hide_declaration() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(
            tmp.path(),
            "tables.sql",
            "-- temporary tables; cleanup later\nCREATE TABLE users (id int PRIMARY KEY);\n",
        );
        let dir = Dir::parse(tmp.path()).unwrap();
        assert_eq!(dir.logical_schemas.len(), 1);
        assert_eq!(
            dir.logical_schemas[0]
                .create_tables
                .keys()
                .collect::<Vec<_>>(),
            vec!["users"]
        );
        assert_eq!(dir.logical_schemas[0].create_tables["users"].line_no, 2);
        assert_eq!(dir.ignored_statements, 0);
    }

    #[test]
    fn table_name_handles_quoting_and_if_not_exists() {
        assert_eq!(table_name("CREATE TABLE users (id int);"), Some("users".into()));
        assert_eq!(
            table_name("create table if not exists `order items` (id int);"),
            Some("order items".into())
        );
        assert_eq!(table_name("INSERT INTO users VALUES (1);"), None);
    }

    #[test]
    fn parse_collects_create_tables_and_counts_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(
            tmp.path(),
            "tables.sql",
            "CREATE TABLE users (id int);\nDROP TABLE widgets;\nCREATE TABLE posts (id int);\n",
        );
        let dir = Dir::parse(tmp.path()).unwrap();
        assert_eq!(dir.logical_schemas.len(), 1);
        let schema = &dir.logical_schemas[0];
        assert_eq!(
            schema.create_tables.keys().collect::<Vec<_>>(),
            vec!["posts", "users"]
        );
        assert_eq!(schema.create_tables["posts"].line_no, 3);
        assert_eq!(dir.ignored_statements, 1);
    }

    #[test]
    fn parse_without_sql_files_yields_no_logical_schemas() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = Dir::parse(tmp.path()).unwrap();
        assert!(dir.logical_schemas.is_empty());
    }

    #[test]
    fn subdirs_inherit_config_and_count_bad_children() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(tmp.path(), "schemalint.toml", "lint-error = \"no-pk\"\n");
        std::fs::create_dir(tmp.path().join("b_ok")).unwrap();
        std::fs::create_dir(tmp.path().join("a_bad")).unwrap();
        write_file(&tmp.path().join("a_bad"), "schemalint.toml", "not valid toml [");

        let dir = Dir::parse(tmp.path()).unwrap();
        let (subdirs, bad_count) = dir.subdirs().unwrap();
        assert_eq!(subdirs.len(), 1);
        assert_eq!(bad_count, 1);
        assert_eq!(subdirs[0].config.lint_error(), vec!["no-pk"]);
    }

    #[test]
    fn rewrite_replaces_statement_in_place() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(tmp.path(), "t.sql", "CREATE TABLE t (id  int);\n");
        let dir = Dir::parse(tmp.path()).unwrap();
        let stmt = dir.logical_schemas[0].create_tables["t"].clone();
        let written = stmt.rewrite("CREATE TABLE t (id int);\n").unwrap();
        let contents = std::fs::read_to_string(tmp.path().join("t.sql")).unwrap();
        assert_eq!(contents, "CREATE TABLE t (id int);\n");
        assert_eq!(written, contents.len());
        // statement text is stale now; a second rewrite must not clobber
        assert!(stmt.rewrite("CREATE TABLE t (id bigint);\n").is_err());
    }
}
