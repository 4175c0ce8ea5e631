//! Removes ignored and automated accounts from reviewer results.

use crate::models::ReviewerResult;
use std::collections::HashSet;

/// Login suffix GitHub uses for app (bot) accounts.
pub const BOT_SUFFIX: &str = "[bot]";

/// Parse a comma-separated ignore list into lowercase logins.
pub fn parse_ignore_list(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Drop ignored logins (case-insensitive) and bot accounts, keeping order.
pub fn filter_reviewers(mut result: ReviewerResult, ignore_list: &str) -> ReviewerResult {
    let ignored = parse_ignore_list(ignore_list);
    result.retain(|login, _| {
        !ignored.contains(&login.to_lowercase()) && !login.ends_with(BOT_SUFFIX)
    });
    result
}
