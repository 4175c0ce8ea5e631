//! Acquisition mode selection and epoch tracking.

use crate::models::{AcquisitionEpoch, Settings};
use crate::services::acquisition::{AcquisitionStrategy, ApiStrategy, ScrapeStrategy};
use crate::services::github_client::GitHubClient;
use crate::services::reviewer_cache::ReviewerCache;
use serde::Serialize;
use std::fmt;

/// Which strategy, if any, acquires reviewers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionMode {
    #[default]
    Off,
    Api,
    Scrape,
}

impl AcquisitionMode {
    /// Scrape wins over the API when both are enabled.
    pub fn from_settings(settings: &Settings) -> Self {
        if settings.scrape_reviewers {
            Self::Scrape
        } else if settings.reviewer_avatars {
            Self::Api
        } else {
            Self::Off
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self != Self::Off
    }

    /// Build the strategy for this mode.
    pub fn strategy(
        &self,
        settings: &Settings,
        client: &GitHubClient,
        cache: &ReviewerCache,
    ) -> Option<AcquisitionStrategy> {
        match self {
            Self::Off => None,
            Self::Api => Some(AcquisitionStrategy::Api(ApiStrategy::new(
                client.clone(),
                cache.clone(),
                settings.token().map(str::to_string),
            ))),
            Self::Scrape => Some(AcquisitionStrategy::Scrape(ScrapeStrategy::new(
                client.clone(),
                cache.clone(),
            ))),
        }
    }
}

impl fmt::Display for AcquisitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Api => "api",
            Self::Scrape => "scrape",
        })
    }
}

/// Outcome of one selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub mode: AcquisitionMode,
    /// The mode differs from the previous selection; rendered state is stale.
    pub changed: bool,
    pub epoch: AcquisitionEpoch,
}

impl ModeTransition {
    /// Rendered columns and the header must be removed before continuing.
    pub fn requires_cleanup(&self) -> bool {
        self.changed || !self.mode.is_enabled()
    }
}

/// Remembers the active mode and advances the epoch on every change.
#[derive(Debug, Default)]
pub struct ModeSelector {
    active: AcquisitionMode,
    epoch: AcquisitionEpoch,
}

impl ModeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, settings: &Settings) -> ModeTransition {
        let mode = AcquisitionMode::from_settings(settings);
        let changed = mode != self.active;
        if changed {
            self.active = mode;
            self.epoch = self.epoch.next();
        }

        ModeTransition {
            mode,
            changed,
            epoch: self.epoch,
        }
    }

    /// Advance the epoch without changing the mode, so every row counts as
    /// unprocessed and in-flight completions are dropped.
    pub fn invalidate(&mut self) -> AcquisitionEpoch {
        self.epoch = self.epoch.next();
        self.epoch
    }

    pub fn active(&self) -> AcquisitionMode {
        self.active
    }

    pub fn epoch(&self) -> AcquisitionEpoch {
        self.epoch
    }
}
