//! Application error types.
//!
//! These errors are serializable so an embedder can forward them to whatever
//! surface hosts the reviewer column (extension popup, devtools, logs).

use serde::Serialize;
use thiserror::Error;

/// Application-level errors.
///
/// All variants serialize to a structured JSON object.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    /// Session store operation failed.
    #[error("Database error: {message}")]
    Database { message: String },

    /// GitHub request returned a non-success status.
    #[error("GitHub API error: {message}")]
    GitHubApi {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
        #[serde(skip_serializing_if = "Option::is_none")]
        endpoint: Option<String>,
    },

    /// Network request failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Bearer token rejected or malformed.
    #[error("Authentication error: {message}")]
    Authentication { message: String },

    /// Invalid input provided.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<String>,
    },

    /// Internal application error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Create a GitHub API error with status code and endpoint.
    pub fn github_api_full(
        message: impl Into<String>,
        status_code: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self::GitHubApi {
            message: message.into(),
            status_code: Some(status_code),
            endpoint: Some(endpoint.into()),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create an invalid input error with field name.
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Status code of a failed GitHub response, if this is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::GitHubApi { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

// Conversions from common error types

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::database(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("Request timed out")
        } else if err.is_connect() {
            Self::network("Failed to connect to server")
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON error: {}", err))
    }
}

impl From<crate::db::DbError> for AppError {
    fn from(err: crate::db::DbError) -> Self {
        Self::database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = AppError::database("disk I/O error");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"type\":\"Database\""));
        assert!(json.contains("disk I/O error"));
    }

    #[test]
    fn test_github_api_error_full() {
        let err = AppError::github_api_full("Not Found", 404, "/repos/o/r/pulls/1/reviews");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"status_code\":404"));
        assert!(json.contains("/repos/o/r/pulls/1/reviews"));
        assert_eq!(err.status_code(), Some(404));
    }

    #[test]
    fn test_invalid_input_field() {
        let err = AppError::invalid_input_field("unknown setting", "colorScheme");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"field\":\"colorScheme\""));
    }

    #[test]
    fn test_status_code_only_for_github_errors() {
        assert_eq!(AppError::network("Request timed out").status_code(), None);
        assert_eq!(AppError::database("error").status_code(), None);
    }

    #[test]
    fn test_display_impl() {
        let err = AppError::authentication("invalid token");
        assert_eq!(format!("{}", err), "Authentication error: invalid token");
    }
}
