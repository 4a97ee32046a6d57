//! Throwaway database lifecycle.
//!
//! Every test run gets its own database, named with a random token so
//! that parallel or repeated runs never collide. Teardown is idempotent:
//! dropping a database that was never created, or was already removed,
//! is a no-op.

use std::marker::PhantomData;

use sqlx::migrate::MigrateDatabase;
use uuid::Uuid;

use crate::error::VerifyResult;

/// Derive a unique temporary database URI from a base URI.
///
/// The last path segment of the base URI is replaced with
/// `test_db_<random hex token>`:
///
/// ```
/// use migrate_verify::temporary_database_uri;
///
/// let uri = temporary_database_uri("postgres://root@localhost/app");
/// assert!(uri.starts_with("postgres://root@localhost/test_db_"));
/// ```
pub fn temporary_database_uri(base_uri: &str) -> String {
    let token = Uuid::new_v4().simple().to_string();
    match base_uri.rsplit_once('/') {
        Some((base, _)) => format!("{base}/test_db_{token}"),
        None => format!("{base_uri}/test_db_{token}"),
    }
}

/// Check whether the database behind `uri` exists.
pub async fn database_exists<DB: MigrateDatabase>(uri: &str) -> VerifyResult<bool> {
    Ok(DB::database_exists(uri).await?)
}

/// Create the database behind `uri`.
pub async fn create_database<DB: MigrateDatabase>(uri: &str) -> VerifyResult<()> {
    Ok(DB::create_database(uri).await?)
}

/// Drop the database if present, then create it brand new.
pub async fn recreate_database<DB: MigrateDatabase>(uri: &str) -> VerifyResult<()> {
    safe_drop_database::<DB>(uri).await?;
    create_database::<DB>(uri).await
}

/// Drop a database, ignoring the case where it does not exist.
pub async fn safe_drop_database<DB: MigrateDatabase>(uri: &str) -> VerifyResult<()> {
    if DB::database_exists(uri).await? {
        DB::drop_database(uri).await?;
    }
    Ok(())
}

/// A temporary database scoped to one test.
///
/// Creating the guard creates the database; [`destroy`](Self::destroy)
/// removes it. Tests should call `destroy` in teardown so the drop is
/// awaited; if the guard falls out of scope instead, cleanup is spawned
/// on the current runtime as a best effort.
#[derive(Debug)]
pub struct EphemeralDatabase<DB: MigrateDatabase + 'static> {
    uri: String,
    destroyed: bool,
    _db: PhantomData<DB>,
}

impl<DB: MigrateDatabase + 'static> EphemeralDatabase<DB> {
    /// Create a fresh database under a unique temporary URI.
    pub async fn create(base_uri: &str) -> VerifyResult<Self> {
        let uri = temporary_database_uri(base_uri);
        recreate_database::<DB>(&uri).await?;
        Ok(Self {
            uri,
            destroyed: false,
            _db: PhantomData,
        })
    }

    /// Connection URI of this database.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Drop the database. Safe to call when it is already gone.
    ///
    /// The guard is only marked clean once the drop succeeds, so a
    /// failed destroy still gets the best-effort cleanup on `Drop`.
    pub async fn destroy(mut self) -> VerifyResult<()> {
        safe_drop_database::<DB>(&self.uri).await?;
        self.destroyed = true;
        Ok(())
    }
}

impl<DB: MigrateDatabase + 'static> Drop for EphemeralDatabase<DB> {
    fn drop(&mut self) {
        if self.destroyed {
            return;
        }
        let uri = std::mem::take(&mut self.uri);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(error) = safe_drop_database::<DB>(&uri).await {
                        tracing::warn!(%uri, %error, "failed to drop temporary database");
                    }
                });
            }
            Err(_) => {
                tracing::warn!(%uri, "temporary database leaked; call destroy() in teardown");
            }
        }
    }
}
