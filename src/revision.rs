//! Applying, rolling back, and inspecting migration revisions.
//!
//! Revisions are the migration tool's version numbers. The "current"
//! revision is the highest version recorded in the target database's
//! migrations table; the "head" revision is the highest version present
//! in the migration source on disk.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use sqlx::migrate::{Migrate, Migrator};
use sqlx::{Connection, Database};

use crate::config::MigratorConfig;
use crate::error::{VerifyError, VerifyResult};

/// How far to upgrade a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpgradeTarget {
    /// Apply every pending migration.
    #[default]
    Head,
    /// Apply at most this many pending migrations.
    Steps(usize),
}

impl fmt::Display for UpgradeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Head => write!(f, "head"),
            Self::Steps(n) => write!(f, "+{n}"),
        }
    }
}

impl FromStr for UpgradeTarget {
    type Err = VerifyError;

    /// Parse `"head"` or a relative step count such as `"+1"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("head") {
            return Ok(Self::Head);
        }
        s.strip_prefix('+')
            .and_then(|n| n.parse().ok())
            .map(Self::Steps)
            .ok_or_else(|| VerifyError::other(format!("invalid upgrade target '{s}'")))
    }
}

/// An open connection together with the migration source that shaped it.
pub struct PreparedMigrations<DB: Database> {
    /// Connection to the migrated database.
    pub connection: DB::Connection,
    /// The loaded migration source.
    pub migrator: Migrator,
}

impl<DB: Database> fmt::Debug for PreparedMigrations<DB> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedMigrations")
            .field("connection", &"<connection>")
            .field("migrator", &self.migrator)
            .finish()
    }
}

/// Connect to the configured database and bring it up to `target`.
///
/// The returned connection can be fed to [`current_revision`] or
/// [`downgrade_one`] for further inspection.
pub async fn prepare_from_migrations<DB>(
    config: &MigratorConfig,
    target: UpgradeTarget,
) -> VerifyResult<PreparedMigrations<DB>>
where
    DB: Database,
    DB::Connection: Migrate,
{
    let migrator = config.load().await?;
    let mut connection = DB::Connection::connect(&config.database_url).await?;
    upgrade(&mut connection, &migrator, target).await?;
    Ok(PreparedMigrations {
        connection,
        migrator,
    })
}

/// Apply pending up migrations until `target` is satisfied.
///
/// Already-applied migrations are validated against their on-disk
/// checksums; a mismatch or a dirty database aborts the upgrade.
pub async fn upgrade<C>(conn: &mut C, migrator: &Migrator, target: UpgradeTarget) -> VerifyResult<()>
where
    C: Migrate,
{
    conn.ensure_migrations_table().await?;

    if let Some(version) = conn.dirty_version().await? {
        return Err(VerifyError::Dirty(version));
    }

    let applied: HashMap<i64, _> = conn
        .list_applied_migrations()
        .await?
        .into_iter()
        .map(|m| (m.version, m.checksum))
        .collect();

    let mut remaining = match target {
        UpgradeTarget::Head => usize::MAX,
        UpgradeTarget::Steps(n) => n,
    };

    for migration in migrator.iter() {
        if migration.migration_type.is_down_migration() {
            continue;
        }

        if let Some(checksum) = applied.get(&migration.version) {
            if *checksum != migration.checksum {
                return Err(VerifyError::ChecksumMismatch {
                    version: migration.version,
                });
            }
            continue;
        }

        if remaining == 0 {
            break;
        }

        conn.apply(migration).await?;
        remaining -= 1;
    }

    Ok(())
}

/// Get the current revision of the database, or `None` when no
/// migration is recorded.
///
/// Works on a brand new database: the migrations table is created on
/// the fly when missing.
pub async fn current_revision<C>(conn: &mut C) -> VerifyResult<Option<i64>>
where
    C: Migrate,
{
    conn.ensure_migrations_table().await?;
    let applied = conn.list_applied_migrations().await?;
    Ok(applied.iter().map(|m| m.version).max())
}

/// Get the head revision of a migration source, or `None` when the
/// source holds no migrations.
pub fn head_revision(migrator: &Migrator) -> Option<i64> {
    migrator
        .iter()
        .filter(|m| !m.migration_type.is_down_migration())
        .map(|m| m.version)
        .max()
}

/// Revert the latest applied migration.
///
/// Returns the reverted version, or `None` when nothing is applied.
/// Fails when the latest applied migration has no down script.
pub async fn downgrade_one<C>(conn: &mut C, migrator: &Migrator) -> VerifyResult<Option<i64>>
where
    C: Migrate,
{
    conn.ensure_migrations_table().await?;

    let applied = conn.list_applied_migrations().await?;
    let Some(latest) = applied.iter().map(|m| m.version).max() else {
        return Ok(None);
    };

    let down = migrator
        .iter()
        .find(|m| m.version == latest && m.migration_type.is_down_migration())
        .ok_or(VerifyError::NoDownMigration(latest))?;

    conn.revert(down).await?;
    Ok(Some(latest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_default_is_head() {
        assert_eq!(UpgradeTarget::default(), UpgradeTarget::Head);
    }

    #[test]
    fn test_target_display() {
        assert_eq!(UpgradeTarget::Head.to_string(), "head");
        assert_eq!(UpgradeTarget::Steps(1).to_string(), "+1");
    }

    #[test]
    fn test_target_parse() {
        assert_eq!("head".parse::<UpgradeTarget>().unwrap(), UpgradeTarget::Head);
        assert_eq!("HEAD".parse::<UpgradeTarget>().unwrap(), UpgradeTarget::Head);
        assert_eq!(
            "+1".parse::<UpgradeTarget>().unwrap(),
            UpgradeTarget::Steps(1)
        );
        assert_eq!(
            "+12".parse::<UpgradeTarget>().unwrap(),
            UpgradeTarget::Steps(12)
        );
    }

    #[test]
    fn test_target_parse_rejects_garbage() {
        assert!("".parse::<UpgradeTarget>().is_err());
        assert!("-1".parse::<UpgradeTarget>().is_err());
        assert!("+x".parse::<UpgradeTarget>().is_err());
        assert!("latest".parse::<UpgradeTarget>().is_err());
    }
}
