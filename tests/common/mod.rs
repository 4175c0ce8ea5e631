//! Shared fixtures: an axum server standing in for both GitHub surfaces
//! (REST API and pull request pages) with per-endpoint hit counters.

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use reviewer_lens::db::SessionStoreConfig;
use reviewer_lens::models::Settings;
use reviewer_lens::services::{
    GitHubClientConfig, LensConfig, ListPage, Orchestrator,
};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned responses keyed by pull request number.
#[derive(Default)]
pub struct MockGitHubBuilder {
    reviews: HashMap<u64, Value>,
    requested: HashMap<u64, Value>,
    pages: HashMap<u64, String>,
    failing: HashSet<u64>,
    slow: HashMap<u64, Duration>,
}

impl MockGitHubBuilder {
    pub fn reviews(mut self, number: u64, reviews: Value) -> Self {
        self.reviews.insert(number, reviews);
        self
    }

    pub fn requested(mut self, number: u64, logins: &[&str]) -> Self {
        let users: Vec<Value> = logins.iter().map(|l| json!({ "login": l })).collect();
        self.requested
            .insert(number, json!({ "users": users, "teams": [] }));
        self
    }

    pub fn page(mut self, number: u64, html: String) -> Self {
        self.pages.insert(number, html);
        self
    }

    /// Every endpoint for `number` answers 500.
    pub fn failing(mut self, number: u64) -> Self {
        self.failing.insert(number);
        self
    }

    /// Every endpoint for `number` answers after `delay`.
    pub fn slow(mut self, number: u64, delay: Duration) -> Self {
        self.slow.insert(number, delay);
        self
    }

    pub async fn start(self) -> MockGitHub {
        let state = Arc::new(MockState {
            reviews: self.reviews,
            requested: self.requested,
            pages: self.pages,
            failing: self.failing,
            slow: self.slow,
            review_hits: AtomicUsize::new(0),
            requested_hits: AtomicUsize::new(0),
            page_hits: AtomicUsize::new(0),
            authorization: Mutex::new(Vec::new()),
            cookies: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/repos/{owner}/{repo}/pulls/{number}/reviews", get(reviews))
            .route(
                "/repos/{owner}/{repo}/pulls/{number}/requested_reviewers",
                get(requested_reviewers),
            )
            .route("/{owner}/{repo}/pull/{number}", get(pull_page))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockGitHub {
            base_url: format!("http://{}", addr),
            state,
        }
    }
}

pub struct MockState {
    reviews: HashMap<u64, Value>,
    requested: HashMap<u64, Value>,
    pages: HashMap<u64, String>,
    failing: HashSet<u64>,
    slow: HashMap<u64, Duration>,
    review_hits: AtomicUsize,
    requested_hits: AtomicUsize,
    page_hits: AtomicUsize,
    authorization: Mutex<Vec<Option<String>>>,
    cookies: Mutex<Vec<Option<String>>>,
}

impl MockState {
    async fn delay(&self, number: u64) {
        if let Some(delay) = self.slow.get(&number) {
            tokio::time::sleep(*delay).await;
        }
    }

    fn record_auth(&self, headers: &HeaderMap) {
        let value = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.authorization.lock().unwrap().push(value);
    }
}

async fn reviews(
    State(state): State<Arc<MockState>>,
    Path((_owner, _repo, number)): Path<(String, String, u64)>,
    headers: HeaderMap,
) -> Response {
    state.review_hits.fetch_add(1, Ordering::SeqCst);
    state.record_auth(&headers);
    state.delay(number).await;

    if state.failing.contains(&number) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(state.reviews.get(&number).cloned().unwrap_or_else(|| json!([]))).into_response()
}

async fn requested_reviewers(
    State(state): State<Arc<MockState>>,
    Path((_owner, _repo, number)): Path<(String, String, u64)>,
    headers: HeaderMap,
) -> Response {
    state.requested_hits.fetch_add(1, Ordering::SeqCst);
    state.record_auth(&headers);

    if state.failing.contains(&number) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(
        state
            .requested
            .get(&number)
            .cloned()
            .unwrap_or_else(|| json!({ "users": [], "teams": [] })),
    )
    .into_response()
}

const NO_SIDEBAR: &str = "<html><body><p>No sidebar here</p></body></html>";

async fn pull_page(
    State(state): State<Arc<MockState>>,
    Path((_owner, _repo, number)): Path<(String, String, u64)>,
    headers: HeaderMap,
) -> Response {
    state.page_hits.fetch_add(1, Ordering::SeqCst);
    state.record_auth(&headers);
    let cookie = headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.cookies.lock().unwrap().push(cookie);
    state.delay(number).await;

    if state.failing.contains(&number) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    match state.pages.get(&number) {
        Some(html) => Html(html.clone()).into_response(),
        None => Html(NO_SIDEBAR.to_string()).into_response(),
    }
}

/// Running mock server.
pub struct MockGitHub {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockGitHub {
    pub fn builder() -> MockGitHubBuilder {
        MockGitHubBuilder::default()
    }

    pub fn review_hits(&self) -> usize {
        self.state.review_hits.load(Ordering::SeqCst)
    }

    pub fn requested_hits(&self) -> usize {
        self.state.requested_hits.load(Ordering::SeqCst)
    }

    pub fn page_hits(&self) -> usize {
        self.state.page_hits.load(Ordering::SeqCst)
    }

    pub fn total_hits(&self) -> usize {
        self.review_hits() + self.requested_hits() + self.page_hits()
    }

    pub fn authorization_headers(&self) -> Vec<Option<String>> {
        self.state.authorization.lock().unwrap().clone()
    }

    pub fn cookie_headers(&self) -> Vec<Option<String>> {
        self.state.cookies.lock().unwrap().clone()
    }

    pub fn client_config(&self) -> GitHubClientConfig {
        GitHubClientConfig {
            api_base_url: self.base_url.clone(),
            web_base_url: self.base_url.clone(),
            session_cookie: Some("session-abc".to_string()),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Orchestrator over `page` talking to this server.
    pub async fn lens(
        &self,
        page: Arc<ListPage>,
        settings: Settings,
    ) -> Arc<Orchestrator<ListPage>> {
        let orchestrator = Orchestrator::open(
            page,
            settings,
            self.client_config(),
            &SessionStoreConfig::default(),
            &LensConfig {
                debounce: Duration::from_millis(100),
                avatar_base_url: "https://avatars.example".to_string(),
            },
        )
        .await
        .unwrap();
        Arc::new(orchestrator)
    }
}

/// API-mode settings.
pub fn api_settings() -> Settings {
    Settings {
        reviewer_avatars: true,
        ..Default::default()
    }
}

/// Pull request page with a reviewer sidebar; `rows` are `(login, svg class)`,
/// an empty class meaning no status icon.
pub fn sidebar_page(rows: &[(&str, &str)]) -> String {
    let rows: String = rows
        .iter()
        .map(|(login, class)| {
            let status = if class.is_empty() {
                String::new()
            } else {
                format!(r#"<a id="review-status-{login}"><svg class="{class}"></svg></a>"#)
            };
            format!(r#"<p class="d-flex"><span data-assignee-name="{login}">{login}</span>{status}</p>"#)
        })
        .collect();

    format!(
        r#"<!DOCTYPE html><html><body><form class="js-issue-sidebar-form" aria-label="Select reviewers">{}</form></body></html>"#,
        rows
    )
}

/// Logins rendered in a row, in column order.
pub fn rendered(page: &ListPage, row: &reviewer_lens::models::RowId) -> Vec<String> {
    page.columns(row)
        .iter()
        .flat_map(|c| c.links.iter().map(|l| l.login.clone()))
        .collect()
}
