//! Paired throwaway databases for comparison tests.
//!
//! Most verification tests need the same scaffolding: two fresh
//! databases created from the same base URI, each with a migration
//! configuration pointing at the shared migrations directory. The
//! harness owns that setup and tears both databases down afterwards.

use std::path::PathBuf;

use sqlx::migrate::MigrateDatabase;

use crate::config::MigratorConfig;
use crate::database::EphemeralDatabase;
use crate::error::VerifyResult;

/// Settings for a verification harness.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Base connection URI; each test database replaces its last path
    /// segment with a unique temporary name.
    pub base_uri: String,
    /// Directory holding the migration scripts.
    pub migrations_dir: PathBuf,
}

impl HarnessConfig {
    /// Create a harness configuration.
    pub fn new(base_uri: impl Into<String>, migrations_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_uri: base_uri.into(),
            migrations_dir: migrations_dir.into(),
        }
    }
}

/// Two ephemeral databases plus their migration configurations.
///
/// The "left" side conventionally receives migrations and the "right"
/// side the model schema, but nothing enforces that split.
#[derive(Debug)]
pub struct VerifyHarness<DB: MigrateDatabase + 'static> {
    left: EphemeralDatabase<DB>,
    right: EphemeralDatabase<DB>,
    left_config: MigratorConfig,
    right_config: MigratorConfig,
}

impl<DB: MigrateDatabase + 'static> VerifyHarness<DB> {
    /// Create both test databases.
    pub async fn set_up(config: &HarnessConfig) -> VerifyResult<Self> {
        let left = EphemeralDatabase::create(&config.base_uri).await?;
        let right = EphemeralDatabase::create(&config.base_uri).await?;
        let left_config = MigratorConfig::new(left.uri(), config.migrations_dir.clone());
        let right_config = MigratorConfig::new(right.uri(), config.migrations_dir.clone());
        Ok(Self {
            left,
            right,
            left_config,
            right_config,
        })
    }

    /// URI of the left database.
    pub fn left_uri(&self) -> &str {
        self.left.uri()
    }

    /// URI of the right database.
    pub fn right_uri(&self) -> &str {
        self.right.uri()
    }

    /// Migration configuration targeting the left database.
    pub fn left_config(&self) -> &MigratorConfig {
        &self.left_config
    }

    /// Migration configuration targeting the right database.
    pub fn right_config(&self) -> &MigratorConfig {
        &self.right_config
    }

    /// Destroy both databases.
    pub async fn tear_down(self) -> VerifyResult<()> {
        self.left.destroy().await?;
        self.right.destroy().await
    }
}
