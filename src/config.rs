//! Migration configuration.

use std::path::PathBuf;

use sqlx::migrate::Migrator;

use crate::error::VerifyResult;

/// Configuration consumed by the migration commands.
///
/// Two settings, mirroring what the migration tool needs: where the
/// migration scripts live, and which database to run them against.
#[derive(Debug, Clone)]
pub struct MigratorConfig {
    /// Path to the migrations directory.
    pub migrations_dir: PathBuf,
    /// Connection URL of the target database.
    pub database_url: String,
}

impl Default for MigratorConfig {
    fn default() -> Self {
        Self {
            migrations_dir: PathBuf::from("./migrations"),
            database_url: String::new(),
        }
    }
}

impl MigratorConfig {
    /// Create a configuration for the given database and migrations directory.
    pub fn new(database_url: impl Into<String>, migrations_dir: impl Into<PathBuf>) -> Self {
        Self {
            migrations_dir: migrations_dir.into(),
            database_url: database_url.into(),
        }
    }

    /// Set the migrations directory.
    pub fn migrations_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.migrations_dir = dir.into();
        self
    }

    /// Set the database connection URL.
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    /// Load the migration source from the configured directory.
    pub async fn load(&self) -> VerifyResult<Migrator> {
        Ok(Migrator::new(self.migrations_dir.as_path()).await?)
    }
}
