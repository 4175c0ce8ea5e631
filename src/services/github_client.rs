//! GitHub HTTP client.
//!
//! Covers the two surfaces the reviewer strategies read: the REST API
//! (reviews and requested reviewers) and the rendered pull request page.

use crate::error::AppError;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// GitHub client configuration.
#[derive(Debug, Clone)]
pub struct GitHubClientConfig {
    /// Base URL of the REST API (e.g., `https://api.github.com`).
    pub api_base_url: String,

    /// Base URL of the web UI (e.g., `https://github.com`).
    pub web_base_url: String,

    /// Session cookie sent with page requests, standing in for the browser's
    /// ambient credentials. Never sent to the API.
    pub session_cookie: Option<String>,

    /// User-Agent header (required by the API).
    pub user_agent: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.github.com".to_string(),
            web_base_url: "https://github.com".to_string(),
            session_cookie: None,
            user_agent: concat!("reviewer-lens/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

/// GitHub client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    config: GitHubClientConfig,
}

/// GitHub user from API.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

/// Submitted pull request review from API.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubReview {
    /// Deleted accounts come back as `null`.
    pub user: Option<GitHubUser>,
    /// `APPROVED`, `CHANGES_REQUESTED`, `COMMENTED`, `DISMISSED` or `PENDING`.
    pub state: String,
    pub body: Option<String>,
}

/// Response from the requested reviewers endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestedReviewers {
    #[serde(default)]
    pub users: Vec<GitHubUser>,
}

impl GitHubClient {
    /// Create a new GitHub client.
    pub fn new(config: GitHubClientConfig) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();

        let user_agent = header::HeaderValue::from_str(&config.user_agent)
            .map_err(|_| AppError::invalid_input_field("Invalid user agent", "user_agent"))?;
        headers.insert(header::USER_AGENT, user_agent);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GitHubClientConfig {
        &self.config
    }

    /// Full REST URL for `path`.
    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    /// Full web URL for `path`.
    fn web_url(&self, path: &str) -> String {
        format!("{}{}", self.config.web_base_url.trim_end_matches('/'), path)
    }

    /// Path prefix for one pull request under `/repos`.
    fn pull_path(owner: &str, repo: &str, number: u64) -> String {
        format!(
            "/repos/{}/{}/pulls/{}",
            urlencoding::encode(owner),
            urlencoding::encode(repo),
            number
        )
    }

    /// Build an authenticated API GET request.
    fn api_get(&self, endpoint: &str, token: Option<&str>) -> Result<RequestBuilder, AppError> {
        let mut request = self
            .client
            .get(self.api_url(endpoint))
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");

        if let Some(token) = token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| AppError::authentication("Invalid token format"))?;
            request = request.header(header::AUTHORIZATION, value);
        }

        Ok(request)
    }

    /// Turn a non-success status into an error.
    async fn check_status(response: Response, endpoint: &str) -> Result<Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        // GitHub returns errors as {"message": "...", "documentation_url": "..."}
        let body_message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string));

        let message = match (status, &body_message) {
            (StatusCode::UNAUTHORIZED, _) => "Bad credentials".to_string(),
            (StatusCode::FORBIDDEN, Some(msg)) if msg.contains("rate limit") => {
                "Rate limit exceeded".to_string()
            }
            (StatusCode::TOO_MANY_REQUESTS, _) => "Rate limit exceeded".to_string(),
            (StatusCode::FORBIDDEN, _) => "Access denied".to_string(),
            (StatusCode::NOT_FOUND, _) => "Resource not found".to_string(),
            (_, Some(msg)) => msg.clone(),
            _ => format!("Request failed ({}): {}", status_code, body),
        };

        Err(AppError::github_api_full(message, status_code, endpoint))
    }

    /// Decode a JSON response body.
    async fn handle_response<T: DeserializeOwned>(
        response: Response,
        endpoint: &str,
    ) -> Result<T, AppError> {
        Self::check_status(response, endpoint)
            .await?
            .json::<T>()
            .await
            .map_err(|e| AppError::internal(format!("Failed to parse response: {}", e)))
    }

    /// List submitted reviews for a pull request (first page only).
    pub async fn list_reviews(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        token: Option<&str>,
    ) -> Result<Vec<GitHubReview>, AppError> {
        let endpoint = format!("{}/reviews", Self::pull_path(owner, repo, number));
        let response = self.api_get(&endpoint, token)?.send().await?;
        Self::handle_response(response, &endpoint).await
    }

    /// List reviewers whose review is still requested.
    pub async fn requested_reviewers(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        token: Option<&str>,
    ) -> Result<RequestedReviewers, AppError> {
        let endpoint = format!("{}/requested_reviewers", Self::pull_path(owner, repo, number));
        let response = self.api_get(&endpoint, token)?.send().await?;
        Self::handle_response(response, &endpoint).await
    }

    /// Fetch the rendered HTML of a pull request page.
    pub async fn fetch_pull_page(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<String, AppError> {
        let path = format!(
            "/{}/{}/pull/{}",
            urlencoding::encode(owner),
            urlencoding::encode(repo),
            number
        );

        let mut request = self
            .client
            .get(self.web_url(&path))
            .header(header::ACCEPT, "text/html");
        if let Some(cookie) = &self.config.session_cookie {
            request = request.header(header::COOKIE, format!("user_session={}", cookie));
        }

        let response = Self::check_status(request.send().await?, &path).await?;
        response
            .text()
            .await
            .map_err(|e| AppError::network(format!("Failed to read page body: {}", e)))
    }
}
