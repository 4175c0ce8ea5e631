//! Debounced reaction to host page mutations.
//!
//! The host forwards structural mutations, settings changes and soft
//! navigations as `PageEvent`s. Mutation bursts are coalesced: every
//! qualifying mutation pushes the deadline out by the debounce window, and
//! one reconciliation runs once the page has been quiet for that long.

use crate::models::SettingChange;
use crate::services::host_page::HostPage;
use crate::services::orchestrator::Orchestrator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// Events forwarded by the host page.
#[derive(Debug, Clone)]
pub enum PageEvent {
    /// Nodes were added or removed somewhere in the document.
    Mutation,

    /// The settings UI changed one key.
    SettingChanged(SettingChange),

    /// The host completed a soft navigation (new list, new rows).
    Navigated,
}

/// Counters reported when the watcher stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatcherStats {
    /// Mutations that (re)armed the debounce deadline.
    pub scheduled: usize,
    /// Debounced reconciliation passes.
    pub reconciles: usize,
    /// Settings changes applied.
    pub setting_changes: usize,
}

/// Event loop driving incremental reconciliation.
pub struct RowWatcher<P: HostPage> {
    orchestrator: Arc<Orchestrator<P>>,
    debounce: Duration,
}

/// Sleep until `deadline`, or forever when there is none.
async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

impl<P: HostPage + 'static> RowWatcher<P> {
    pub fn new(orchestrator: Arc<Orchestrator<P>>) -> Self {
        let debounce = orchestrator.debounce();
        Self {
            orchestrator,
            debounce,
        }
    }

    /// Whether a mutation should (re)arm the deadline.
    async fn should_schedule(&self) -> bool {
        self.orchestrator.is_enabled() && self.orchestrator.has_unprocessed_rows().await
    }

    /// Process events until the sender side is dropped.
    pub async fn run(self, mut events: mpsc::Receiver<PageEvent>) -> WatcherStats {
        let mut stats = WatcherStats::default();
        let mut deadline: Option<Instant> = None;

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(PageEvent::Mutation) => {
                        if self.should_schedule().await {
                            deadline = Some(Instant::now() + self.debounce);
                            stats.scheduled += 1;
                        }
                    }
                    Some(PageEvent::SettingChanged(change)) => {
                        match self.orchestrator.apply_setting(&change).await {
                            Ok(_) => stats.setting_changes += 1,
                            Err(e) => {
                                log::warn!("[watcher] Ignoring setting {}: {}", change.key, e)
                            }
                        }
                    }
                    Some(PageEvent::Navigated) => {
                        deadline = None;
                        self.orchestrator.init().await;
                    }
                    None => break,
                },
                _ = wait_for(deadline) => {
                    deadline = None;
                    let summary = self.orchestrator.reconcile().await;
                    stats.reconciles += 1;
                    log::debug!(
                        "[watcher] Reconciled {} new row(s), {} placeholder(s)",
                        summary.launched,
                        summary.placeholders
                    );
                }
            }
        }

        log::debug!("[watcher] Event channel closed, stopping");
        stats
    }

    /// Run the watcher on a background task.
    pub fn spawn(self, events: mpsc::Receiver<PageEvent>) -> JoinHandle<WatcherStats> {
        tokio::spawn(self.run(events))
    }
}
