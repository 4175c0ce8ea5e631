//! User settings snapshot and inbound change events.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Settings read by the reviewer pipeline.
///
/// Owned by the host (extension storage); the pipeline only ever sees whole
/// snapshots and replaces them on each change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Fetch reviewers through the REST API.
    pub reviewer_avatars: bool,

    /// Fetch reviewers by scraping the pull request page. Wins over the API.
    pub scrape_reviewers: bool,

    /// Decorate authors with avatars. Handled outside this crate.
    pub author_avatar: bool,

    /// Hide the assignee column. Handled outside this crate.
    pub hide_assignees: bool,

    /// Cache reviewer results for the session.
    pub enable_cache: bool,

    /// Comma-separated logins to leave out of the reviewer column.
    pub ignore_users: String,

    /// Optional bearer token for the REST API.
    pub gh_token: String,
}

/// A single `{key, value}` change sent by the settings UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingChange {
    pub key: String,
    pub value: Value,
}

impl SettingChange {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Settings {
    /// Return a new snapshot with `change` applied.
    ///
    /// Unknown keys and values of the wrong type are rejected; `self` is never
    /// modified.
    pub fn with_change(&self, change: &SettingChange) -> Result<Settings, AppError> {
        let mut fields = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => return Err(AppError::internal("Settings did not serialize to an object")),
        };

        match fields.get_mut(&change.key) {
            Some(slot) => *slot = change.value.clone(),
            None => {
                return Err(AppError::invalid_input_field(
                    "Unknown setting",
                    change.key.clone(),
                ))
            }
        }

        serde_json::from_value(Value::Object(fields)).map_err(|e| {
            AppError::invalid_input_field(format!("Invalid value: {}", e), change.key.clone())
        })
    }

    /// The bearer token, if one is configured.
    pub fn token(&self) -> Option<&str> {
        let token = self.gh_token.trim();
        (!token.is_empty()).then_some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.reviewer_avatars);
        assert!(!settings.scrape_reviewers);
        assert!(!settings.enable_cache);
        assert!(settings.token().is_none());
    }

    #[test]
    fn test_deserialize_partial_storage_payload() {
        let settings: Settings =
            serde_json::from_value(json!({ "scrapeReviewers": true, "ignoreUsers": "bob" }))
                .unwrap();
        assert!(settings.scrape_reviewers);
        assert_eq!(settings.ignore_users, "bob");
        assert!(!settings.reviewer_avatars);
    }

    #[test]
    fn test_with_change_replaces_one_key() {
        let settings = Settings::default();
        let updated = settings
            .with_change(&SettingChange::new("enableCache", true))
            .unwrap();
        assert!(updated.enable_cache);
        assert!(!settings.enable_cache);
    }

    #[test]
    fn test_with_change_rejects_unknown_key() {
        let err = Settings::default()
            .with_change(&SettingChange::new("darkMode", true))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { field: Some(ref f), .. } if f == "darkMode"));
    }

    #[test]
    fn test_with_change_rejects_wrong_type() {
        let result = Settings::default().with_change(&SettingChange::new("reviewerAvatars", "yes"));
        assert!(result.is_err());
    }

    #[test]
    fn test_token_is_trimmed() {
        let settings = Settings {
            gh_token: "  ghp_abc  ".to_string(),
            ..Default::default()
        };
        assert_eq!(settings.token(), Some("ghp_abc"));
    }
}
