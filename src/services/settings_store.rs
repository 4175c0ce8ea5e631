//! Process-wide settings snapshot.
//!
//! The snapshot is immutable; every change builds a new `Settings` and swaps
//! it in whole, so readers never observe a half-applied update.

use crate::error::AppError;
use crate::models::{SettingChange, Settings};
use std::sync::Arc;
use tokio::sync::watch;

/// Shared handle to the current settings snapshot.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    tx: Arc<watch::Sender<Arc<Settings>>>,
}

/// Before/after pair produced by one change.
#[derive(Debug, Clone)]
pub struct SettingsUpdate {
    pub previous: Arc<Settings>,
    pub current: Arc<Settings>,
}

impl SettingsUpdate {
    /// Whether caching was on before and is off now.
    pub fn cache_disabled(&self) -> bool {
        self.previous.enable_cache && !self.current.enable_cache
    }
}

impl SettingsStore {
    pub fn new(initial: Settings) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { tx: Arc::new(tx) }
    }

    /// The current snapshot.
    pub fn current(&self) -> Arc<Settings> {
        self.tx.borrow().clone()
    }

    /// Replace the whole snapshot (e.g. after a fresh storage read).
    pub fn replace(&self, settings: Settings) -> SettingsUpdate {
        let current = Arc::new(settings);
        let previous = self.tx.send_replace(current.clone());
        SettingsUpdate { previous, current }
    }

    /// Apply a single `{key, value}` change.
    pub fn apply(&self, change: &SettingChange) -> Result<SettingsUpdate, AppError> {
        let next = self.current().with_change(change)?;
        Ok(self.replace(next))
    }

    /// Receiver notified on every replacement.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Settings>> {
        self.tx.subscribe()
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
