//! Session cache for reviewer results.
//!
//! Best-effort: a disabled cache, a corrupt or expired entry and a failed
//! write all look like a miss to the caller. Nothing here returns an error.

use crate::db::pool::DbPool;
use crate::db::session_store;
use crate::models::{CacheEntry, ReviewerResult, CACHE_KEY_PREFIX};
use crate::services::settings_store::SettingsStore;
use chrono::Utc;

/// Current Unix time in milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// TTL-bounded reviewer cache over the session store.
#[derive(Debug, Clone)]
pub struct ReviewerCache {
    pool: DbPool,
    settings: SettingsStore,
}

impl ReviewerCache {
    pub fn new(pool: DbPool, settings: SettingsStore) -> Self {
        Self { pool, settings }
    }

    fn enabled(&self) -> bool {
        self.settings.current().enable_cache
    }

    /// Look up a fresh entry.
    pub async fn get(&self, key: &str) -> Option<ReviewerResult> {
        self.get_at(key, now_ms()).await
    }

    /// Look up an entry as of `now` (Unix ms). Expired or unparsable entries
    /// are deleted.
    pub async fn get_at(&self, key: &str, now: i64) -> Option<ReviewerResult> {
        if !self.enabled() {
            return None;
        }

        let raw = match session_store::get_value(&self.pool, key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::debug!("[cache] Read failed for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) if !entry.is_expired(now) => Some(entry.reviewer_result),
            Ok(_) => {
                log::debug!("[cache] Expired entry {}", key);
                self.evict(key).await;
                None
            }
            Err(e) => {
                log::debug!("[cache] Corrupt entry {}: {}", key, e);
                self.evict(key).await;
                None
            }
        }
    }

    /// Store `result` stamped with the current time.
    pub async fn set(&self, key: &str, result: &ReviewerResult) {
        self.set_at(key, result, now_ms()).await
    }

    /// Store `result` stamped with `created_at` (Unix ms).
    pub async fn set_at(&self, key: &str, result: &ReviewerResult, created_at: i64) {
        if !self.enabled() {
            return;
        }

        let raw = match serde_json::to_string(&CacheEntry::new(result.clone(), created_at)) {
            Ok(raw) => raw,
            Err(e) => {
                log::debug!("[cache] Failed to serialize {}: {}", key, e);
                return;
            }
        };

        // Storage full or unavailable
        if let Err(e) = session_store::put_value(&self.pool, key, &raw).await {
            log::debug!("[cache] Write skipped for {}: {}", key, e);
        }
    }

    /// Delete every reviewer entry, whether or not caching is enabled.
    pub async fn clear(&self) -> u64 {
        match session_store::delete_prefix(&self.pool, CACHE_KEY_PREFIX).await {
            Ok(deleted) => {
                if deleted > 0 {
                    log::info!("[cache] Cleared {} reviewer entries", deleted);
                }
                deleted
            }
            Err(e) => {
                log::warn!("[cache] Failed to clear reviewer entries: {}", e);
                0
            }
        }
    }

    async fn evict(&self, key: &str) {
        if let Err(e) = session_store::delete_value(&self.pool, key).await {
            log::debug!("[cache] Failed to evict {}: {}", key, e);
        }
    }
}
