//! Data models for the reviewer pipeline.
//!
//! These models represent reviewer results, their cached form, per-row
//! processing records and the settings snapshot the pipeline reads.

pub mod cache_entry;
pub mod reviewer;
pub mod row;
pub mod settings;

// Re-exports for convenient access
pub use cache_entry::{cache_key, CacheEntry, CACHE_KEY_PREFIX, CACHE_TTL_MS};
pub use reviewer::{ReviewerResult, ReviewerState};
pub use row::{AcquisitionEpoch, RowId, RowRecord};
pub use settings::{SettingChange, Settings};
