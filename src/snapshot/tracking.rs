//! Deletion tracking against the previously published snapshot.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use super::writer::SnapshotWriter;
use crate::domain::{DeletionLog, ThreadRecord, find_deleted};
use crate::error::SyncError;

/// Outcome of one tracking pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingOutcome {
    /// No earlier `threads-all.json`; nothing to compare against.
    NoPreviousSnapshot,
    /// Every previously published id is still present.
    NoDeletions,
    /// Some ids disappeared and a log was written.
    Logged {
        /// Number of removed records.
        count: usize,
        /// Path of the deletion log.
        path: PathBuf,
    },
}

/// Compares `current` with the previous snapshot in `writer`'s directory
/// and writes a deletion log when records went missing.
///
/// Previous records are matched by `id` alone and logged as published.
///
/// Must run before the new snapshot overwrites `threads-all.json`.
///
/// # Errors
///
/// Returns a [`SyncError`] if the previous snapshot is unreadable or the
/// log cannot be written. A missing previous snapshot is not an error.
pub async fn track_deletions(
    writer: &SnapshotWriter,
    current: &[ThreadRecord],
    now: DateTime<Utc>,
) -> Result<TrackingOutcome, SyncError> {
    let Some(previous) = writer.load_previous().await? else {
        tracing::info!("no previous data found, skipping deletion tracking");
        return Ok(TrackingOutcome::NoPreviousSnapshot);
    };

    let deleted = find_deleted(&previous, current);
    if deleted.is_empty() {
        tracing::info!("no deletions detected");
        return Ok(TrackingOutcome::NoDeletions);
    }

    let count = deleted.len();
    tracing::info!(count, "detected deleted threads");
    let path = writer
        .write_deletion_log(&DeletionLog::new(deleted, now))
        .await?;
    tracing::info!(path = %path.display(), "saved deletion log");

    Ok(TrackingOutcome::Logged { count, path })
}
