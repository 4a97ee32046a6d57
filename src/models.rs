//! Schemas declared by the application's models.
//!
//! The model side of a verification run is an ordered list of DDL
//! statements describing the schema the models expect. Applying it to a
//! fresh database is the counterpart of applying all migrations to
//! another one; the two results are then handed to the comparer.

use sqlx::{Connection, Database, Executor};

use crate::error::VerifyResult;

/// Ordered DDL statements declaring the model schema.
#[derive(Debug, Clone, Default)]
pub struct ModelSchema {
    statements: Vec<String>,
}

impl ModelSchema {
    /// Create an empty model schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single DDL statement.
    pub fn statement(mut self, sql: impl Into<String>) -> Self {
        self.statements.push(sql.into());
        self
    }

    /// Append several DDL statements in order.
    pub fn statements<I, S>(mut self, sql: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statements.extend(sql.into_iter().map(Into::into));
        self
    }

    /// The statements in application order.
    pub fn as_slice(&self) -> &[String] {
        &self.statements
    }

    /// Whether the schema declares anything at all.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Execute every statement in order on the given connection.
    pub async fn apply<DB>(&self, conn: &mut DB::Connection) -> VerifyResult<()>
    where
        DB: Database,
        for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
    {
        for sql in &self.statements {
            conn.execute(sql.as_str()).await?;
        }
        Ok(())
    }
}

/// Connect to `uri` and build the schema the models declare.
///
/// Returns the open connection so callers can inspect the result.
pub async fn prepare_from_models<DB>(uri: &str, schema: &ModelSchema) -> VerifyResult<DB::Connection>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
{
    let mut conn = DB::Connection::connect(uri).await?;
    schema.apply::<DB>(&mut conn).await?;
    Ok(conn)
}
