//! Stored OAuth token with the profile seen at login.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::threads::UserProfile;

/// Document kept in the `users` collection, keyed by [`TokenRecord::user_id`].
///
/// Overwritten on each login. Expiry is not tracked here.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Threads user id.
    pub user_id: String,
    /// Opaque access token.
    pub access_token: String,
    /// When the token was obtained.
    pub token_created_at: DateTime<Utc>,
    /// Profile snapshot taken right after the exchange; empty when the
    /// profile fetch failed.
    pub profile: UserProfile,
    /// Last write time.
    pub last_updated: DateTime<Utc>,
}

impl TokenRecord {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(user_id: String, access_token: String, profile: UserProfile) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            access_token,
            token_created_at: now,
            profile,
            last_updated: now,
        }
    }
}

impl std::fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRecord")
            .field("user_id", &self.user_id)
            .field("access_token", &"<redacted>")
            .field("token_created_at", &self.token_created_at)
            .field("profile", &self.profile)
            .field("last_updated", &self.last_updated)
            .finish()
    }
}
