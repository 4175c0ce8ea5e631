//! Reviewer pipeline services.
//!
//! Leaves first: the session cache and ignore filter, the GitHub client and
//! the two acquisition strategies built on it, mode selection, rendering,
//! and finally the orchestrator and the debounced row watcher driving it.
//!
//! Services are independent of any particular host document; the page is
//! reached only through `HostPage`.

pub mod acquisition;
pub mod github_client;
pub mod host_page;
pub mod ignore_filter;
pub mod mode_selector;
pub mod orchestrator;
pub mod page_scraper;
pub mod renderer;
pub mod reviewer_cache;
pub mod row_registry;
pub mod row_watcher;
pub mod settings_store;

pub use acquisition::AcquisitionStrategy;
pub use github_client::{GitHubClient, GitHubClientConfig};
pub use host_page::{HostPage, ListPage, PageRow};
pub use mode_selector::{AcquisitionMode, ModeSelector};
pub use orchestrator::{LensConfig, Orchestrator, ReconcileSummary};
pub use renderer::{Renderer, ReviewerColumn, ReviewerLink};
pub use reviewer_cache::ReviewerCache;
pub use row_watcher::{PageEvent, RowWatcher, WatcherStats};
pub use settings_store::SettingsStore;
