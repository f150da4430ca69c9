//! Database rows for the document store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row of the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredUser {
    /// Threads user id.
    pub user_id: String,
    /// Profile snapshot as JSONB.
    pub profile: serde_json::Value,
    /// When the stored token was obtained.
    pub token_created_at: DateTime<Utc>,
    /// Last write time.
    pub last_updated: DateTime<Utc>,
}

/// A row of the `curated_threads` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredThread {
    /// External post id.
    pub id: String,
    /// Merged thread document as JSONB.
    pub doc: serde_json::Value,
    /// Server-side write timestamp.
    pub cached_at: DateTime<Utc>,
    /// Advisory expiry; no reaper uses it.
    pub expires_at: DateTime<Utc>,
}
