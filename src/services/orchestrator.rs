//! Reviewer column reconciliation.
//!
//! Each pass:
//! 1. Selects the acquisition mode and cleans up if it changed
//! 2. Marks every unprocessed row as processed before any fetch starts
//! 3. Resolves all rows concurrently, rendering each as it completes
//! 4. Sizes the shared column once the whole batch has settled

use crate::db::{self, SessionStoreConfig};
use crate::error::AppError;
use crate::models::{AcquisitionEpoch, ReviewerResult, RowId, SettingChange, Settings};
use crate::services::acquisition::AcquisitionStrategy;
use crate::services::github_client::{GitHubClient, GitHubClientConfig};
use crate::services::host_page::HostPage;
use crate::services::ignore_filter::filter_reviewers;
use crate::services::mode_selector::{AcquisitionMode, ModeSelector};
use crate::services::renderer::Renderer;
use crate::services::reviewer_cache::ReviewerCache;
use crate::services::row_registry::RowRegistry;
use crate::services::settings_store::SettingsStore;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Default debounce window for row mutations.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Pipeline configuration not owned by the settings UI.
#[derive(Debug, Clone)]
pub struct LensConfig {
    /// Quiet period after the last row mutation before reconciling.
    pub debounce: Duration,

    /// Base URL for `{base}/{login}.png` avatars.
    pub avatar_base_url: String,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            avatar_base_url: "https://github.com".to_string(),
        }
    }
}

/// What one reconciliation pass did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileSummary {
    pub mode: AcquisitionMode,
    pub epoch: AcquisitionEpoch,
    /// Rendered state was removed because the mode changed or is off.
    pub cleaned_up: bool,
    /// Rows whose reviewers were resolved through the strategy.
    pub launched: usize,
    /// Launched rows rendered with their result.
    pub rendered: usize,
    /// Rows without a resolvable PR number, rendered empty for alignment.
    pub placeholders: usize,
    /// Rows skipped for lack of a container.
    pub skipped: usize,
    /// Completions dropped because the epoch moved on while in flight.
    pub discarded: usize,
    /// Column width applied after the batch, if any links are rendered.
    pub column_width: Option<u32>,
}

#[derive(Debug, Default)]
struct LensState {
    modes: ModeSelector,
    rows: RowRegistry,
}

/// Owner and repository from a pull request list path (`/owner/repo/pulls...`).
pub fn parse_pulls_path(path: &str) -> Option<(String, String)> {
    let mut segments = path.strip_prefix('/')?.splitn(3, '/');
    let owner = segments.next().filter(|s| !s.is_empty())?;
    let repo = segments.next().filter(|s| !s.is_empty())?;
    let rest = segments.next()?;

    rest.starts_with("pulls")
        .then(|| (owner.to_string(), repo.to_string()))
}

/// Pull request number from the last path segment of a row link.
pub fn pr_number_from_href(href: &str) -> Option<u64> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    path.rsplit('/').next()?.parse().ok()
}

/// Ties the cache, strategies, renderer and row registry together.
pub struct Orchestrator<P: HostPage> {
    page: Arc<P>,
    settings: SettingsStore,
    cache: ReviewerCache,
    client: GitHubClient,
    renderer: Renderer,
    debounce: Duration,
    state: Mutex<LensState>,
}

impl<P: HostPage> Orchestrator<P> {
    pub fn new(
        page: Arc<P>,
        settings: SettingsStore,
        cache: ReviewerCache,
        client: GitHubClient,
        config: &LensConfig,
    ) -> Self {
        Self {
            page,
            settings,
            cache,
            client,
            renderer: Renderer::new(config.avatar_base_url.clone()),
            debounce: config.debounce,
            state: Mutex::new(LensState::default()),
        }
    }

    /// Open a session store and HTTP client, then build the orchestrator.
    pub async fn open(
        page: Arc<P>,
        settings: Settings,
        client_config: GitHubClientConfig,
        store_config: &SessionStoreConfig,
        config: &LensConfig,
    ) -> Result<Self, AppError> {
        let pool = db::initialize(store_config).await?;
        let settings = SettingsStore::new(settings);
        let cache = ReviewerCache::new(pool, settings.clone());
        let client = GitHubClient::new(client_config)?;

        Ok(Self::new(page, settings, cache, client, config))
    }

    pub fn page(&self) -> &Arc<P> {
        &self.page
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn cache(&self) -> &ReviewerCache {
        &self.cache
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Whether the current settings enable any acquisition mode.
    pub fn is_enabled(&self) -> bool {
        AcquisitionMode::from_settings(&self.settings.current()).is_enabled()
    }

    /// Whether any row in the page lacks a record for the current epoch.
    pub async fn has_unprocessed_rows(&self) -> bool {
        let state = self.state.lock().await;
        let epoch = state.modes.epoch();
        self.page
            .rows()
            .iter()
            .any(|row| !state.rows.is_processed(&row.id, epoch))
    }

    /// Startup and soft-navigation entry point.
    ///
    /// The host rebuilds row elements on navigation and may reuse row ids
    /// (`issue_<number>` is only unique per repository), so every row is
    /// treated as new: the epoch advances and rendered columns are removed.
    pub async fn init(&self) -> ReconcileSummary {
        if !self.settings.current().enable_cache {
            self.cache.clear().await;
        }

        {
            let mut state = self.state.lock().await;
            let epoch = state.modes.invalidate();
            self.renderer.clear(&*self.page);
            log::debug!("[reconcile] Page reset, epoch {}", epoch.0);
        }

        self.reconcile().await
    }

    /// Apply one settings change and reconcile under the new snapshot.
    pub async fn apply_setting(
        &self,
        change: &SettingChange,
    ) -> Result<ReconcileSummary, AppError> {
        let update = self.settings.apply(change)?;
        log::debug!("[reconcile] Setting {} changed", change.key);

        if update.cache_disabled() {
            self.cache.clear().await;
        }

        Ok(self.reconcile().await)
    }

    /// Run one reconciliation pass over the rows not yet processed.
    pub async fn reconcile(&self) -> ReconcileSummary {
        let settings = self.settings.current();
        let mut summary = ReconcileSummary::default();

        let (strategy, owner, repo, launches) = {
            let mut state = self.state.lock().await;

            let transition = state.modes.select(&settings);
            summary.mode = transition.mode;
            summary.epoch = transition.epoch;

            if transition.requires_cleanup() {
                self.renderer.clear(&*self.page);
                summary.cleaned_up = true;
                if transition.changed {
                    log::info!(
                        "[reconcile] Mode is now {} (epoch {})",
                        transition.mode,
                        transition.epoch.0
                    );
                }
            }

            let Some(strategy) = transition
                .mode
                .strategy(&settings, &self.client, &self.cache)
            else {
                return summary;
            };

            self.renderer.ensure_header(&*self.page);

            let path = self.page.location_path();
            let Some((owner, repo)) = parse_pulls_path(&path) else {
                log::debug!("[reconcile] {} is not a pull request list", path);
                return summary;
            };

            let rows = self.page.rows();
            state.rows.retain_live(rows.iter().map(|row| &row.id));

            let mut launches = Vec::new();
            for row in rows {
                if state.rows.is_processed(&row.id, transition.epoch) {
                    continue;
                }

                // Marked before any await so an overlapping pass cannot pick it up again
                let pr_number = row.pr_href.as_deref().and_then(pr_number_from_href);
                state
                    .rows
                    .mark_processed(&row.id, pr_number, transition.epoch);

                if !row.has_container {
                    summary.skipped += 1;
                    continue;
                }

                match pr_number {
                    Some(number) => launches.push((row.id, number)),
                    None => {
                        self.renderer
                            .render_row(&*self.page, &row.id, &ReviewerResult::new());
                        summary.placeholders += 1;
                    }
                }
            }

            (strategy, owner, repo, launches)
        };

        summary.launched = launches.len();
        if !launches.is_empty() {
            log::debug!(
                "[reconcile] Resolving {} row(s) for {}/{} via {}",
                launches.len(),
                owner,
                repo,
                strategy.name()
            );
        }

        let epoch = summary.epoch;
        let outcomes = join_all(launches.iter().map(|(row_id, number)| {
            self.resolve_and_render(&strategy, &owner, &repo, row_id, *number, epoch)
        }))
        .await;

        summary.rendered = outcomes.iter().filter(|&&rendered| rendered).count();
        summary.discarded = outcomes.len() - summary.rendered;
        summary.column_width = self.renderer.recompute_column_width(&*self.page);

        summary
    }

    /// Resolve one row and render it if its epoch is still current.
    async fn resolve_and_render(
        &self,
        strategy: &AcquisitionStrategy,
        owner: &str,
        repo: &str,
        row_id: &RowId,
        number: u64,
        epoch: AcquisitionEpoch,
    ) -> bool {
        let reviewers = strategy.resolve(owner, repo, number).await;

        let state = self.state.lock().await;
        if state.modes.epoch() != epoch || !state.rows.is_processed(row_id, epoch) {
            log::debug!(
                "[reconcile] Dropping stale result for {}/{}#{} (epoch {})",
                owner,
                repo,
                number,
                epoch.0
            );
            return false;
        }

        let filtered = filter_reviewers(reviewers, &self.settings.current().ignore_users);
        self.renderer.render_row(&*self.page, row_id, &filtered);
        true
    }
}
