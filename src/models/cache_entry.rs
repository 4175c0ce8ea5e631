//! Cached reviewer result for one pull request.

use super::ReviewerResult;
use serde::{Deserialize, Serialize};

/// Fixed time-to-live for cached reviewer results (5 minutes).
pub const CACHE_TTL_MS: i64 = 5 * 60 * 1000;

/// Prefix shared by every reviewer cache key.
pub const CACHE_KEY_PREFIX: &str = "reviewers:";

/// Serialized form of a reviewer cache record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub reviewer_result: ReviewerResult,
    /// Unix timestamp in milliseconds.
    pub created_at: i64,
}

impl CacheEntry {
    pub fn new(reviewer_result: ReviewerResult, created_at: i64) -> Self {
        Self {
            reviewer_result,
            created_at,
        }
    }

    /// Whether the entry is older than the TTL at `now_ms`.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms - self.created_at > CACHE_TTL_MS
    }
}

/// Cache key for a pull request: `reviewers:{owner}/{repo}#{number}`.
pub fn cache_key(owner: &str, repo: &str, number: u64) -> String {
    format!("{}{}/{}#{}", CACHE_KEY_PREFIX, owner, repo, number)
}
