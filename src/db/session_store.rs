//! Key/value queries over the session cache table.

use crate::db::pool::DbPool;
use crate::error::AppError;

/// Get the raw value stored under `key`.
pub async fn get_value(pool: &DbPool, key: &str) -> Result<Option<String>, AppError> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM session_cache WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(value,)| value))
}

/// Insert or replace the value stored under `key`.
pub async fn put_value(pool: &DbPool, key: &str, value: &str) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO session_cache (key, value, updated_at)
        VALUES (?, ?, strftime('%s', 'now'))
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete the value stored under `key`.
pub async fn delete_value(pool: &DbPool, key: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM session_cache WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;

    Ok(())
}

/// Delete every key starting with `prefix`.
///
/// # Returns
/// Number of deleted entries
pub async fn delete_prefix(pool: &DbPool, prefix: &str) -> Result<u64, AppError> {
    // substr comparison avoids LIKE wildcard handling for '_' and '%' in keys
    let result = sqlx::query("DELETE FROM session_cache WHERE substr(key, 1, length(?1)) = ?1")
        .bind(prefix)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Count stored entries.
pub async fn count_entries(pool: &DbPool) -> Result<i64, AppError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM session_cache")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
