//! Deletion diff between two snapshot generations.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::thread::ThreadRecord;

/// Reason code recorded for records missing from the latest fetch.
pub const NOT_FOUND_IN_API: &str = "not_found_in_api";

/// Audit record written when previously published threads disappear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionLog {
    /// When the deletion was detected.
    pub deleted_at: DateTime<Utc>,
    /// The removed records exactly as they were last published.
    pub deleted_threads: Vec<Value>,
    /// Fixed reason code.
    pub reason: String,
}

impl DeletionLog {
    /// Wraps `deleted` into a log entry stamped `now`.
    #[must_use]
    pub fn new(deleted: Vec<Value>, now: DateTime<Utc>) -> Self {
        Self {
            deleted_at: now,
            deleted_threads: deleted,
            reason: NOT_FOUND_IN_API.to_string(),
        }
    }
}

/// The `id` of a published record, if it has a string one.
#[must_use]
pub fn published_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

/// Returns the records of `previous` whose id is absent from `current`,
/// untouched and in their original order.
///
/// Only the `id` of each previous record is inspected. Records without a
/// string `id` cannot be matched and are skipped.
#[must_use]
pub fn find_deleted(previous: &[Value], current: &[ThreadRecord]) -> Vec<Value> {
    let current_ids: HashSet<&str> = current.iter().map(|t| t.id.as_str()).collect();
    previous
        .iter()
        .filter(|record| published_id(record).is_some_and(|id| !current_ids.contains(id)))
        .cloned()
        .collect()
}
