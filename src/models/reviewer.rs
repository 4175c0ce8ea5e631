//! Reviewer state and the ordered per-work-item reviewer result.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Review state of one reviewer on one pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewerState {
    /// Requested, nothing submitted yet.
    Pending,
    Approved,
    ChangesRequested,
    Commented,
}

impl ReviewerState {
    /// Lowercase wire name, also used in CSS classes and tooltips.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::ChangesRequested => "changes_requested",
            Self::Commented => "commented",
        }
    }
}

impl fmt::Display for ReviewerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewerState {
    type Err = String;

    /// Parses a review state case-insensitively (`APPROVED`, `approved`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "changes_requested" => Ok(Self::ChangesRequested),
            "commented" => Ok(Self::Commented),
            other => Err(format!("Unknown reviewer state: {}", other)),
        }
    }
}

/// Ordered mapping from reviewer login to review state.
///
/// Order is discovery order. Overwriting an existing login keeps its original
/// position, so a later review changes the state but not the column order.
/// Serializes as a list of `[login, state]` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewerResult {
    entries: Vec<(String, ReviewerState)>,
}

impl ReviewerResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or override the state for `login`.
    pub fn set(&mut self, login: impl Into<String>, state: ReviewerState) {
        let login = login.into();
        match self.entries.iter_mut().find(|(name, _)| *name == login) {
            Some(entry) => entry.1 = state,
            None => self.entries.push((login, state)),
        }
    }

    /// Append `login` with `state` unless it already has an entry.
    ///
    /// Returns whether the entry was added.
    pub fn insert_if_absent(&mut self, login: impl Into<String>, state: ReviewerState) -> bool {
        let login = login.into();
        if self.contains(&login) {
            return false;
        }
        self.entries.push((login, state));
        true
    }

    pub fn get(&self, login: &str) -> Option<ReviewerState> {
        self.entries
            .iter()
            .find(|(name, _)| name == login)
            .map(|(_, state)| *state)
    }

    pub fn contains(&self, login: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == login)
    }

    /// Keep only the entries for which `keep` returns true, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, ReviewerState) -> bool) {
        self.entries.retain(|(name, state)| keep(name, *state));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ReviewerState)> {
        self.entries.iter().map(|(name, state)| (name.as_str(), *state))
    }

    pub fn logins(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, ReviewerState)> for ReviewerResult {
    fn from_iter<I: IntoIterator<Item = (S, ReviewerState)>>(iter: I) -> Self {
        let mut result = Self::new();
        for (login, state) in iter {
            result.set(login, state);
        }
        result
    }
}
