//! Snapshot manifest describing one generated batch of files.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::thread::{ThreadRecord, ThreadType};

/// Schema version written into every manifest.
pub const MANIFEST_VERSION: &str = "1.0.0";

/// Hours until the next refresh is recommended.
pub const REFRESH_INTERVAL_HOURS: i64 = 6;

/// Per-type record counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts {
    /// Text records.
    pub text: usize,
    /// Image records.
    pub image: usize,
}

/// Contents of `manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// When the snapshot was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of records in `threads-all.json`.
    pub total_threads: usize,
    /// Counts by type.
    pub by_type: TypeCounts,
    /// Accounts the records were pulled from.
    pub sources: Vec<String>,
    /// When the next update should run.
    pub next_update_recommended: DateTime<Utc>,
    /// Manifest schema version.
    pub version: String,
}

impl Manifest {
    /// Builds the manifest for `threads` generated at `now`.
    #[must_use]
    pub fn new(threads: &[ThreadRecord], sources: &[&str], now: DateTime<Utc>) -> Self {
        let image = threads
            .iter()
            .filter(|t| t.thread_type == ThreadType::Image)
            .count();
        Self {
            generated_at: now,
            total_threads: threads.len(),
            by_type: TypeCounts {
                text: threads.len() - image,
                image,
            },
            sources: sources.iter().map(ToString::to_string).collect(),
            next_update_recommended: now + Duration::hours(REFRESH_INTERVAL_HOURS),
            version: MANIFEST_VERSION.to_string(),
        }
    }
}
