//! Single-connection in-memory SQLite pool.
//!
//! An in-memory SQLite database lives exactly as long as the connection that
//! opened it, so the pool is pinned to one connection that never idles out.
//! Dropping the pool ends the session and discards the data.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

/// Type alias for the SQLite connection pool.
pub type DbPool = Pool<Sqlite>;

/// Create the session pool.
///
/// # Returns
/// A pool holding exactly one live connection to a fresh in-memory database
pub async fn create_session_pool() -> Result<DbPool, sqlx::Error> {
    let connect_options = SqliteConnectOptions::from_str("sqlite::memory:")?
        // Nothing is persisted, a rollback journal in memory is enough
        .journal_mode(SqliteJournalMode::Memory)
        .busy_timeout(std::time::Duration::from_secs(5));

    SqlitePoolOptions::new()
        // A second connection would see a different, empty database
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .acquire_timeout(std::time::Duration::from_secs(10))
        .connect_with(connect_options)
        .await
}
