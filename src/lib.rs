//! # migrate-verify
//!
//! Testing support for keeping sqlx migrations and declared model
//! schemas in sync.
//!
//! The library wires the migration tool ([`sqlx::migrate`]) together
//! with the schema your models declare, so a test suite can check that
//! running every migration from an empty database produces the same
//! schema as the models. It provides:
//!
//! - Throwaway test databases with collision-resistant names and
//!   idempotent teardown
//! - Migration configuration and upgrade/rollback/revision helpers
//! - A comparer seam plus a result wrapper that dumps difference
//!   reports to JSON for debugging
//! - A harness pairing two test databases for comparison tests
//!
//! The structural schema diff itself is delegated to an external
//! [`SchemaComparer`] implementation; this crate never inspects
//! tables, columns, indexes, or foreign keys on its own.
//!
//! ## Example
//!
//! ```rust,ignore
//! use migrate_verify::{
//!     prepare_from_migrations, prepare_from_models, HarnessConfig, ModelSchema,
//!     UpgradeTarget, VerifyHarness,
//! };
//! use sqlx::Postgres;
//!
//! # async fn example(comparer: impl migrate_verify::SchemaComparer, models: ModelSchema)
//! # -> migrate_verify::VerifyResult<()> {
//! let harness = VerifyHarness::<Postgres>::set_up(&HarnessConfig::new(
//!     "postgres://root@localhost/app",
//!     "./migrations",
//! ))
//! .await?;
//!
//! // Left: every migration from empty. Right: the model schema.
//! prepare_from_migrations::<Postgres>(harness.left_config(), UpgradeTarget::Head).await?;
//! prepare_from_models::<Postgres>(harness.right_uri(), &models).await?;
//!
//! let ignore = ["_sqlx_migrations".to_string()].into_iter().collect();
//! let result = comparer
//!     .compare(harness.left_uri(), harness.right_uri(), &ignore)
//!     .await?;
//!
//! if !result.is_match() {
//!     result.dump_errors().await?;
//! }
//! assert!(result.is_match());
//!
//! harness.tear_down().await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod compare;
pub mod config;
pub mod database;
pub mod error;
pub mod harness;
pub mod models;
pub mod report;
pub mod revision;

pub use compare::{ComparisonResult, SchemaComparer, DEFAULT_ERRORS_DUMP, DEFAULT_INFO_DUMP};
pub use config::MigratorConfig;
pub use database::{
    create_database, database_exists, recreate_database, safe_drop_database,
    temporary_database_uri, EphemeralDatabase,
};
pub use error::{VerifyError, VerifyResult};
pub use harness::{HarnessConfig, VerifyHarness};
pub use models::{prepare_from_models, ModelSchema};
pub use report::{items_equal, normalize_report, reports_equal, walk_value};
pub use revision::{
    current_revision, downgrade_one, head_revision, prepare_from_migrations, upgrade,
    PreparedMigrations, UpgradeTarget,
};
