//! End-to-end walker tests over real directory trees

use schemalint_core::Dir;
use schemalint_engine::{lint_walker, Registry};
use schemalint_eval::{SqlEvaluator, WorkspaceOptions};
use std::path::Path;

fn write_file(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

/// Build a 3-level tree where every level declares one table without a
/// primary key.
fn build_tree(root: &Path) {
    write_file(root, "tables.sql", "CREATE TABLE t_root (id int);\n");
    let level1 = root.join("level1");
    std::fs::create_dir(&level1).unwrap();
    write_file(&level1, "tables.sql", "CREATE TABLE t_one (id int);\n");
    let level2 = level1.join("level2");
    std::fs::create_dir(&level2).unwrap();
    write_file(&level2, "tables.sql", "CREATE TABLE t_two (id int);\n");
    let level3 = level2.join("level3");
    std::fs::create_dir(&level3).unwrap();
    write_file(&level3, "tables.sql", "CREATE TABLE t_three (id int);\n");
}

fn walk(root: &Path, max_depth: usize) -> schemalint_core::LintResult {
    let dir = Dir::parse(root).unwrap();
    lint_walker(
        &dir,
        &SqlEvaluator::new(),
        &Registry::builtin(),
        &WorkspaceOptions::default(),
        max_depth,
    )
}

#[test]
fn deep_tree_is_fully_visited_in_listing_order() {
    let tmp = tempfile::tempdir().unwrap();
    build_tree(tmp.path());

    let result = walk(tmp.path(), 5);
    assert!(result.exceptions.is_empty());
    // one no-pk error per level, parent first
    let tables: Vec<&str> = result
        .errors
        .iter()
        .filter(|a| a.summary == "No primary key")
        .map(|a| {
            ["t_root", "t_one", "t_two", "t_three"]
                .into_iter()
                .find(|t| a.message.contains(t))
                .unwrap()
        })
        .collect();
    assert_eq!(tables, vec!["t_root", "t_one", "t_two", "t_three"]);
}

#[test]
fn exhausted_depth_budget_is_reported_not_silently_truncated() {
    let tmp = tempfile::tempdir().unwrap();
    build_tree(tmp.path());

    let result = walk(tmp.path(), 0);
    // only the root was linted
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.contains("t_root"));
    assert_eq!(result.exceptions.len(), 1);
    assert!(result.exceptions[0].to_string().contains("max depth reached"));
}

#[test]
fn depth_budget_exhausted_at_leaf_without_subdirs_is_clean() {
    let tmp = tempfile::tempdir().unwrap();
    write_file(tmp.path(), "tables.sql", "CREATE TABLE solo (id int primary key);\n");

    let result = walk(tmp.path(), 0);
    assert!(result.exceptions.is_empty());
    assert!(result.errors.is_empty());
}

#[test]
fn unlistable_directory_keeps_findings_and_records_exception() {
    let tmp = tempfile::tempdir().unwrap();
    let doomed = tmp.path().join("doomed");
    std::fs::create_dir(&doomed).unwrap();
    write_file(&doomed, "tables.sql", "CREATE TABLE t (id int);\n");
    let dir = Dir::parse(&doomed).unwrap();
    // the declarations are already in memory; losing the directory only
    // breaks subdirectory listing
    std::fs::remove_dir_all(&doomed).unwrap();

    let result = lint_walker(
        &dir,
        &SqlEvaluator::new(),
        &Registry::builtin(),
        &WorkspaceOptions::default(),
        5,
    );
    assert_eq!(result.exceptions.len(), 1);
    assert!(result.exceptions[0]
        .to_string()
        .contains("Cannot list subdirs"));
    assert!(result
        .errors
        .iter()
        .any(|a| a.message.contains("t does not define a PRIMARY KEY")));
}

#[test]
fn subdirs_with_bad_config_are_counted_and_siblings_still_walked() {
    let tmp = tempfile::tempdir().unwrap();
    let bad = tmp.path().join("bad");
    std::fs::create_dir(&bad).unwrap();
    write_file(&bad, "schemalint.toml", "lint-error = [not, toml");
    let good = tmp.path().join("good");
    std::fs::create_dir(&good).unwrap();
    write_file(&good, "tables.sql", "CREATE TABLE g (id int);\n");

    let result = walk(tmp.path(), 5);
    assert_eq!(result.exceptions.len(), 1);
    assert!(result.exceptions[0]
        .to_string()
        .contains("Ignoring 1 subdirs"));
    assert!(result
        .errors
        .iter()
        .any(|a| a.message.contains("g does not define a PRIMARY KEY")));
}

#[test]
fn non_canonical_declaration_yields_format_notice() {
    let tmp = tempfile::tempdir().unwrap();
    write_file(
        tmp.path(),
        "tables.sql",
        "create   table users (id int primary key);\n",
    );

    let result = walk(tmp.path(), 5);
    assert_eq!(result.format_notices.len(), 1);
    let notice = &result.format_notices[0];
    assert!(notice.message.starts_with("CREATE TABLE"));
    assert!(notice.message.ends_with(";\n"));
}

#[test]
fn invalid_sql_surfaces_as_statement_error() {
    let tmp = tempfile::tempdir().unwrap();
    write_file(
        tmp.path(),
        "tables.sql",
        "CREATE TABLE broken (id int,,);\n",
    );

    let result = walk(tmp.path(), 5);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].summary, "SQL statement returned an error");
}
