//! Reviewer Lens - reviewer status columns for pull request list pages.
//!
//! Pull request list pages do not show who has reviewed what. This library
//! resolves each listed pull request's reviewers (through the REST API or by
//! scraping the pull request page), caches them for the session, filters out
//! ignored and bot accounts, and renders one reviewer column per row,
//! re-rendering only rows the host page adds later.
//!
//! Typical wiring:
//!
//! ```no_run
//! use reviewer_lens::db::SessionStoreConfig;
//! use reviewer_lens::models::Settings;
//! use reviewer_lens::services::{
//!     GitHubClientConfig, LensConfig, ListPage, Orchestrator, PageEvent, RowWatcher,
//! };
//! use std::sync::Arc;
//!
//! # async fn wire() -> Result<(), reviewer_lens::error::AppError> {
//! let page = Arc::new(ListPage::new("/rust-lang/cargo/pulls"));
//! let settings = Settings { reviewer_avatars: true, ..Default::default() };
//! let orchestrator = Arc::new(
//!     Orchestrator::open(
//!         page,
//!         settings,
//!         GitHubClientConfig::default(),
//!         &SessionStoreConfig::default(),
//!         &LensConfig::default(),
//!     )
//!     .await?,
//! );
//!
//! orchestrator.init().await;
//!
//! let (events, rx) = tokio::sync::mpsc::channel(64);
//! let watcher = RowWatcher::new(orchestrator).spawn(rx);
//! events.send(PageEvent::Mutation).await.ok();
//! # drop(events);
//! # watcher.await.ok();
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use error::AppError;
