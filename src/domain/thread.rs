//! Curated thread record and its construction from a raw post.

use std::fmt;
use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::threads::ThreadsPost;

/// Range of synthetic like counts.
pub const LIKES_RANGE: RangeInclusive<u32> = 5_000..=50_000;

/// Range of synthetic reply counts.
pub const REPLIES_RANGE: RangeInclusive<u32> = 100..=5_000;

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=";

/// Content kind of a thread record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadType {
    /// Text-only post (anything that is not a single image).
    Text,
    /// Single-image post.
    Image,
}

impl ThreadType {
    /// Returns the type tag as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for ThreadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post after filtering and transformation, as written to the snapshot
/// files and the document store.
///
/// Engagement numbers are synthetic and regenerated on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadRecord {
    /// External post id.
    pub id: String,
    /// Display name derived from the handle.
    pub author: String,
    /// Author handle.
    pub handle: String,
    /// Generated avatar URL.
    pub avatar: String,
    /// Post text (empty when the post has none).
    pub content: String,
    /// Media URL for image posts.
    pub image: Option<String>,
    /// Synthetic like count.
    pub likes: u32,
    /// Synthetic reply count.
    pub replies: u32,
    /// Content kind.
    #[serde(rename = "type")]
    pub thread_type: ThreadType,
    /// Original creation time, verbatim from the API.
    pub timestamp: String,
    /// Public URL of the post.
    pub permalink: String,
    /// Topic tag, if any.
    pub topic_tag: Option<String>,
    /// When this record was produced.
    pub fetched_at: DateTime<Utc>,
}

impl ThreadRecord {
    /// Builds a record from a raw post, drawing engagement numbers from
    /// `rng`.
    pub fn from_post<R: Rng>(
        post: &ThreadsPost,
        rng: &mut R,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let is_image = post.is_image();
        Self {
            id: post.id.clone(),
            author: display_name(&post.username),
            handle: post.username.clone(),
            avatar: format!("{AVATAR_BASE_URL}{}", post.username),
            content: post.text.clone().unwrap_or_default(),
            image: if is_image { post.media_url.clone() } else { None },
            likes: rng.random_range(LIKES_RANGE),
            replies: rng.random_range(REPLIES_RANGE),
            thread_type: if is_image {
                ThreadType::Image
            } else {
                ThreadType::Text
            },
            timestamp: post.timestamp.clone(),
            permalink: post.permalink.clone(),
            topic_tag: post.topic_tag.clone(),
            fetched_at,
        }
    }
}

/// Sorts records newest first. Equal timestamps keep their input order.
pub fn sort_newest_first(records: &mut [ThreadRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Turns a handle into a display name: underscores become spaces and each
/// word is capitalised.
#[must_use]
pub fn display_name(handle: &str) -> String {
    let mut out = String::with_capacity(handle.len());
    let mut prev_alpha = false;
    for ch in handle.replace('_', " ").chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}
