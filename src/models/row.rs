//! Per-row processing records and the acquisition epoch.

use serde::Serialize;
use std::fmt;

/// Stable identifier of a row in the host page.
///
/// Hosts typically use the row's DOM id (`issue_1234`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RowId(pub String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Counter advanced whenever the acquisition mode changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AcquisitionEpoch(pub u64);

impl AcquisitionEpoch {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// What the reconciler knows about one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowRecord {
    pub row_id: RowId,
    /// Pull request number parsed from the row's link, if any.
    pub pr_number: Option<u64>,
    /// Epoch the row was processed under.
    pub epoch: AcquisitionEpoch,
}

impl RowRecord {
    pub fn is_processed_in(&self, epoch: AcquisitionEpoch) -> bool {
        self.epoch == epoch
    }
}
