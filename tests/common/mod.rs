//! Shared scaffolding for the verification tests.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use migrate_verify::{ComparisonResult, ModelSchema, SchemaComparer, VerifyResult};
use serde_json::json;
use sqlx::{Connection, SqliteConnection};

/// Bookkeeping table of the migration tool, excluded from comparisons.
pub const MIGRATIONS_TABLE: &str = "_sqlx_migrations";

/// Base URI under a per-test temporary directory.
pub fn base_uri(dir: &Path) -> String {
    format!("sqlite:{}/app.db", dir.display())
}

/// Directory holding the test migration scripts.
pub fn migrations_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/migrations")
}

pub fn ignore_tables() -> HashSet<String> {
    [MIGRATIONS_TABLE.to_string()].into_iter().collect()
}

/// The schema the models declare, equivalent to the full migration
/// sequence in `tests/migrations`.
pub fn model_schema() -> ModelSchema {
    ModelSchema::new().statements([
        "CREATE TABLE roles (
            id INTEGER PRIMARY KEY,
            name VARCHAR(50) NOT NULL
        )",
        "CREATE TABLE employees (
            id INTEGER PRIMARY KEY,
            name VARCHAR(200),
            age INTEGER NOT NULL DEFAULT 21,
            ssn VARCHAR(30) NOT NULL,
            number_of_pets INTEGER NOT NULL DEFAULT 1,
            role_id INTEGER NOT NULL DEFAULT 0
        )",
        "CREATE UNIQUE INDEX ix_employees_name ON employees (name)",
        "CREATE TABLE phone_numbers (
            id INTEGER PRIMARY KEY,
            number VARCHAR(40),
            owner INTEGER NOT NULL REFERENCES employees (id)
        )",
    ])
}

/// Comparer double that diffs table name sets only.
///
/// The real comparer is an external dependency; table names are enough
/// to exercise the harness wiring and the report helpers end to end.
pub struct TableNameComparer;

async fn table_names(uri: &str, ignore: &HashSet<String>) -> VerifyResult<BTreeSet<String>> {
    let mut conn = SqliteConnection::connect(uri).await?;
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_all(&mut conn)
    .await?;
    conn.close().await?;
    Ok(names.into_iter().filter(|n| !ignore.contains(n)).collect())
}

#[async_trait]
impl SchemaComparer for TableNameComparer {
    async fn compare(
        &self,
        left_uri: &str,
        right_uri: &str,
        ignore_tables: &HashSet<String>,
    ) -> VerifyResult<ComparisonResult> {
        let left = table_names(left_uri, ignore_tables).await?;
        let right = table_names(right_uri, ignore_tables).await?;

        let left_only: Vec<String> = left.difference(&right).cloned().collect();
        let right_only: Vec<String> = right.difference(&left).cloned().collect();
        let common: Vec<String> = left.intersection(&right).cloned().collect();

        let info = json!({
            "tables": {
                "common": &common,
                "left_only": &left_only,
                "right_only": &right_only,
            },
            "uris": {"left": left_uri, "right": right_uri},
        });

        if left_only.is_empty() && right_only.is_empty() {
            return Ok(ComparisonResult::matching(info));
        }

        let errors = json!({
            "tables": {"left_only": &left_only, "right_only": &right_only},
            "uris": {"left": left_uri, "right": right_uri},
        });
        Ok(ComparisonResult::with_errors(info, errors))
    }
}
