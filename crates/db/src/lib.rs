//! PostgreSQL persistence for sites, the material ledger, warehouse stock,
//! batches, and feed records.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Postgres, Transaction};

pub mod error;
pub mod models;
pub mod repositories;

pub use error::{RepoError, RepoResult};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Bound every blocking lock taken for the rest of the transaction.
///
/// A lock that is not granted in time fails with `55P03`, which
/// [`RepoError`] reports as lock contention.
pub async fn set_lock_timeout(
    tx: &mut Transaction<'_, Postgres>,
    timeout: Duration,
) -> Result<(), sqlx::Error> {
    // SET does not accept bind parameters; the value is an integer.
    let statement = format!("SET LOCAL lock_timeout = '{}ms'", timeout.as_millis());
    sqlx::query(&statement).execute(&mut **tx).await?;
    Ok(())
}
