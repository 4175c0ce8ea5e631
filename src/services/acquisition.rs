//! Reviewer acquisition strategies.
//!
//! Two interchangeable ways to resolve the reviewers of one pull request:
//! the REST API (reviews + requested reviewers) and scraping the rendered
//! pull request page. Both consult the session cache first, write it on
//! success, and turn every failure into an empty result.

use crate::error::AppError;
use crate::models::{cache_key, ReviewerResult, ReviewerState};
use crate::services::github_client::{GitHubClient, GitHubReview, RequestedReviewers};
use crate::services::page_scraper;
use crate::services::reviewer_cache::ReviewerCache;

/// Fold submitted reviews and outstanding requests into one result.
///
/// Reviews apply in order, later ones overriding earlier ones for the same
/// login. Dismissed reviews and empty pending drafts are skipped. Requested
/// reviewers are appended as pending only when they have no accepted review.
pub fn fold_reviews(reviews: &[GitHubReview], requested: &RequestedReviewers) -> ReviewerResult {
    let mut reviewers = ReviewerResult::new();

    for review in reviews {
        let Some(user) = &review.user else {
            continue;
        };

        let state = review.state.to_lowercase();
        let has_body = review.body.as_deref().is_some_and(|body| !body.is_empty());
        if state == "dismissed" || (state == "pending" && !has_body) {
            continue;
        }

        match state.parse::<ReviewerState>() {
            Ok(state) => reviewers.set(user.login.clone(), state),
            Err(e) => log::debug!("[acquire] Skipping review by {}: {}", user.login, e),
        }
    }

    for user in &requested.users {
        reviewers.insert_if_absent(user.login.clone(), ReviewerState::Pending);
    }

    reviewers
}

/// REST API strategy.
#[derive(Debug, Clone)]
pub struct ApiStrategy {
    client: GitHubClient,
    cache: ReviewerCache,
    token: Option<String>,
}

impl ApiStrategy {
    pub fn new(client: GitHubClient, cache: ReviewerCache, token: Option<String>) -> Self {
        Self {
            client,
            cache,
            token,
        }
    }

    async fn fetch(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<ReviewerResult, AppError> {
        let token = self.token.as_deref();
        let reviews = self.client.list_reviews(owner, repo, number, token).await?;
        let requested = self
            .client
            .requested_reviewers(owner, repo, number, token)
            .await?;

        Ok(fold_reviews(&reviews, &requested))
    }
}

/// Page scrape strategy.
#[derive(Debug, Clone)]
pub struct ScrapeStrategy {
    client: GitHubClient,
    cache: ReviewerCache,
}

impl ScrapeStrategy {
    pub fn new(client: GitHubClient, cache: ReviewerCache) -> Self {
        Self { client, cache }
    }

    async fn fetch(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<ReviewerResult, AppError> {
        let html = self.client.fetch_pull_page(owner, repo, number).await?;

        match page_scraper::parse_reviewer_sidebar(&html)? {
            Some(reviewers) => Ok(reviewers),
            None => {
                log::debug!(
                    "[acquire] No reviewer form on {}/{}#{}",
                    owner,
                    repo,
                    number
                );
                Ok(ReviewerResult::new())
            }
        }
    }
}

/// The active acquisition strategy.
#[derive(Debug, Clone)]
pub enum AcquisitionStrategy {
    Api(ApiStrategy),
    Scrape(ScrapeStrategy),
}

impl AcquisitionStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Api(_) => "api",
            Self::Scrape(_) => "scrape",
        }
    }

    fn cache(&self) -> &ReviewerCache {
        match self {
            Self::Api(strategy) => &strategy.cache,
            Self::Scrape(strategy) => &strategy.cache,
        }
    }

    /// Resolve the reviewers of one pull request.
    ///
    /// Never fails: acquisition errors are logged and yield an empty result,
    /// which is not cached.
    pub async fn resolve(&self, owner: &str, repo: &str, number: u64) -> ReviewerResult {
        let key = cache_key(owner, repo, number);
        if let Some(cached) = self.cache().get(&key).await {
            return cached;
        }

        let fetched = match self {
            Self::Api(strategy) => strategy.fetch(owner, repo, number).await,
            Self::Scrape(strategy) => strategy.fetch(owner, repo, number).await,
        };

        match fetched {
            Ok(reviewers) => {
                self.cache().set(&key, &reviewers).await;
                reviewers
            }
            Err(e) => {
                log::warn!(
                    "[acquire] {} lookup failed for {}/{}#{}: {}",
                    self.name(),
                    owner,
                    repo,
                    number,
                    e
                );
                ReviewerResult::new()
            }
        }
    }
}
