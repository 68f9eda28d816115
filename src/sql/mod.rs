//! SQLite database operations for parkade.
//!
//! This module provides functions for interacting with the database, organized by
//! table.  Every operation takes an open transaction so callers decide where the
//! commit/rollback boundary lies.

use std::str::FromStr;
use std::time::Duration;

use sqlx::{Sqlite, SqlitePool, Transaction};
use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Client operations.
pub mod client;

/// Pairing operations between clients and parkings.
pub mod client_parking;

/// Parking operations, including the available-places counter.
pub mod parking;

/// How long a connection waits for another writer before giving up with `SQLITE_BUSY`.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Opens a connection pool, creating the database file if it does not exist.
///
/// Foreign key enforcement is switched on for every connection.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Opens a private in-memory database with the schema already applied.
///
/// The pool holds exactly one connection that never expires; an in-memory SQLite
/// database lives only as long as its connection.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Opens a transaction that holds the write lock from its first statement.
///
/// A deferred transaction that reads before it writes cannot upgrade its lock while
/// another writer is active, so read-modify-write units must start here instead.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Applies the embedded migrations.
pub async fn migrate(pool: &SqlitePool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
