//! Comparison results and the comparer seam.
//!
//! The structural diff itself (tables, columns, indexes, foreign keys)
//! lives in an external comparer; this module only defines the trait
//! such a comparer implements and the result object it produces, with
//! support for dumping either side of the result to disk for debugging.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::VerifyResult;

/// Default file name for [`ComparisonResult::dump_info`].
pub const DEFAULT_INFO_DUMP: &str = "info_dump.json";

/// Default file name for [`ComparisonResult::dump_errors`].
pub const DEFAULT_ERRORS_DUMP: &str = "errors_dump.json";

/// A structural schema comparer for two live databases.
///
/// Implementations are expected to ignore the tables named in
/// `ignore_tables`; callers typically pass the migration tool's own
/// bookkeeping table.
#[async_trait]
pub trait SchemaComparer {
    /// Compare the schemas behind the two URIs.
    async fn compare(
        &self,
        left_uri: &str,
        right_uri: &str,
        ignore_tables: &HashSet<String>,
    ) -> VerifyResult<ComparisonResult>;
}

/// Outcome of one schema comparison.
///
/// `info` describes everything the comparer looked at; `errors` holds
/// only the differences. The two schemas match exactly when `errors`
/// is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Full description of the comparison.
    pub info: Value,
    /// Differences found, empty on a match.
    pub errors: Value,
}

impl ComparisonResult {
    /// A result with no differences.
    pub fn matching(info: Value) -> Self {
        Self {
            info,
            errors: Value::Object(Default::default()),
        }
    }

    /// A result carrying differences.
    pub fn with_errors(info: Value, errors: Value) -> Self {
        Self { info, errors }
    }

    /// Whether the two schemas were found equivalent.
    pub fn is_match(&self) -> bool {
        match &self.errors {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Write the `info` side to `info_dump.json` in the working directory.
    pub async fn dump_info(&self) -> VerifyResult<()> {
        self.dump_info_to(DEFAULT_INFO_DUMP).await
    }

    /// Write the `info` side to the given path.
    pub async fn dump_info_to(&self, path: impl AsRef<Path>) -> VerifyResult<()> {
        dump(&self.info, path.as_ref()).await
    }

    /// Write the `errors` side to `errors_dump.json` in the working directory.
    pub async fn dump_errors(&self) -> VerifyResult<()> {
        self.dump_errors_to(DEFAULT_ERRORS_DUMP).await
    }

    /// Write the `errors` side to the given path.
    pub async fn dump_errors_to(&self, path: impl AsRef<Path>) -> VerifyResult<()> {
        dump(&self.errors, path.as_ref()).await
    }
}

/// Pretty-printed with sorted keys, so dumps diff cleanly across runs.
async fn dump(value: &Value, path: &Path) -> VerifyResult<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, rendered).await?;
    Ok(())
}
