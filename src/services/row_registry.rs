//! Registry of rows processed under each acquisition epoch.

use crate::models::{AcquisitionEpoch, RowId, RowRecord};
use std::collections::{HashMap, HashSet};

/// Row records keyed by row id.
///
/// A row is processed when its record carries the current epoch, so
/// advancing the epoch invalidates every record at once.
#[derive(Debug, Default)]
pub struct RowRegistry {
    records: HashMap<RowId, RowRecord>,
}

impl RowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_processed(&self, row: &RowId, epoch: AcquisitionEpoch) -> bool {
        self.records
            .get(row)
            .is_some_and(|record| record.is_processed_in(epoch))
    }

    /// Record `row` as processed under `epoch`.
    ///
    /// Returns false if it already was.
    pub fn mark_processed(
        &mut self,
        row: &RowId,
        pr_number: Option<u64>,
        epoch: AcquisitionEpoch,
    ) -> bool {
        if self.is_processed(row, epoch) {
            return false;
        }
        self.records.insert(
            row.clone(),
            RowRecord {
                row_id: row.clone(),
                pr_number,
                epoch,
            },
        );
        true
    }

    /// Drop records for rows no longer in the document.
    ///
    /// Returns the number of dropped records.
    pub fn retain_live<'a>(&mut self, live: impl IntoIterator<Item = &'a RowId>) -> usize {
        let live: HashSet<&RowId> = live.into_iter().collect();
        let before = self.records.len();
        self.records.retain(|id, _| live.contains(id));
        before - self.records.len()
    }

    pub fn get(&self, row: &RowId) -> Option<&RowRecord> {
        self.records.get(row)
    }

    pub fn processed_count(&self, epoch: AcquisitionEpoch) -> usize {
        self.records
            .values()
            .filter(|record| record.is_processed_in(epoch))
            .count()
    }
}
