//! Session store for cached reviewer results.
//!
//! This module handles:
//! - The single-connection in-memory pool
//! - Schema migrations
//! - Key/value query helpers

pub mod pool;
pub mod session_store;

use thiserror::Error;

/// Database-related errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Session store configuration.
#[derive(Debug, Clone, Default)]
pub struct SessionStoreConfig {
    /// Upper bound on database pages (`PRAGMA max_page_count`).
    ///
    /// Writes that would grow the store past the bound fail with SQLITE_FULL.
    /// `None` leaves SQLite's default.
    pub max_page_count: Option<u32>,
}

/// Open a fresh session store and run migrations.
///
/// # Returns
/// A pool over an empty in-memory database with the cache schema applied
pub async fn initialize(config: &SessionStoreConfig) -> Result<pool::DbPool, DbError> {
    let pool = pool::create_session_pool().await?;

    run_migrations(&pool).await?;

    if let Some(max_pages) = config.max_page_count {
        // SQLite clamps the value to the current page count, never below
        sqlx::query(&format!("PRAGMA max_page_count = {}", max_pages))
            .execute(&pool)
            .await?;
    }

    Ok(pool)
}

/// Run all pending migrations.
async fn run_migrations(pool: &pool::DbPool) -> Result<(), DbError> {
    let mut conn = pool.acquire().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            applied_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    let applied: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM _migrations WHERE name = '0001_session_cache'")
            .fetch_optional(&mut *conn)
            .await?;

    if applied.is_none() {
        let migration_sql = include_str!("migrations/0001_session_cache.sql");

        sqlx::raw_sql(migration_sql)
            .execute(&mut *conn)
            .await
            .map_err(|e| DbError::Migration(format!("0001_session_cache: {}", e)))?;

        sqlx::query("INSERT INTO _migrations (name) VALUES ('0001_session_cache')")
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}
