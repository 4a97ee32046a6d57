//! Error types for the verification helpers.

use thiserror::Error;

/// Result type alias for verification operations.
pub type VerifyResult<T> = Result<T, VerifyError>;

/// Errors that can occur while preparing or inspecting test databases.
///
/// Failures inside the migration tool or the driver are not classified
/// further; they propagate to the test framework, which reports them as
/// test failures.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database driver error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Error from the migration tool.
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Report serialization error.
    #[error("report serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// An applied migration no longer matches its on-disk content.
    #[error("migration {version} was modified after being applied")]
    ChecksumMismatch {
        /// Version of the modified migration.
        version: i64,
    },

    /// A previous migration run failed partway through.
    #[error("database is dirty: migration {0} did not complete")]
    Dirty(i64),

    /// The latest applied migration cannot be reverted.
    #[error("migration {0} has no down script")]
    NoDownMigration(i64),

    /// General verification error.
    #[error("{0}")]
    Other(String),
}

impl VerifyError {
    /// Create a general verification error.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
