//! Wire types for the Threads Graph API.

use serde::{Deserialize, Deserializer, Serialize};

/// Fields requested for the authenticated user's profile.
pub const PROFILE_FIELDS: &str = "id,username,name,threads_profile_picture_url,threads_biography";

/// Fields requested when only checking that a token works.
pub const VERIFY_FIELDS: &str = "id,username";

/// Fields requested for each post in a profile listing.
pub const POST_FIELDS: &str = "id,media_product_type,media_type,media_url,permalink,username,text,topic_tag,timestamp,shortcode,thumbnail_url,is_quote_post";

/// Successful response of `POST /oauth/access_token`.
///
/// Both fields are optional on the wire; callers decide what a missing
/// value means.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    /// Short-lived user access token.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Threads user id. The API sends a number; older responses used a
    /// string.
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: Option<String>,
}

/// Profile of the authenticated user (`GET /me`).
///
/// Unknown fields are kept in `extra` so the profile can be stored and
/// returned without loss.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Threads user id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Handle without the `@`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads_profile_picture_url: Option<String>,
    /// Profile bio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads_biography: Option<String>,
    /// Any other fields returned by the API.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    /// True when no field at all was returned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.username.is_none()
            && self.name.is_none()
            && self.threads_profile_picture_url.is_none()
            && self.threads_biography.is_none()
            && self.extra.is_empty()
    }
}

/// A single media object from `GET /profile_posts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadsPost {
    /// Media id.
    pub id: String,
    /// Author handle.
    pub username: String,
    /// ISO-8601 creation time as sent by the API.
    pub timestamp: String,
    /// Public URL of the post.
    #[serde(default)]
    pub permalink: String,
    /// `TEXT_POST`, `IMAGE`, `VIDEO` or `CAROUSEL_ALBUM`.
    #[serde(default)]
    pub media_type: Option<String>,
    /// Always `THREADS` for this API.
    #[serde(default)]
    pub media_product_type: Option<String>,
    /// Media URL for image and video posts.
    #[serde(default)]
    pub media_url: Option<String>,
    /// Post body.
    #[serde(default)]
    pub text: Option<String>,
    /// Topic tag attached by the author.
    #[serde(default)]
    pub topic_tag: Option<String>,
    /// Short code used in the permalink.
    #[serde(default)]
    pub shortcode: Option<String>,
    /// Thumbnail for video posts.
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Whether the post quotes another post.
    #[serde(default)]
    pub is_quote_post: Option<bool>,
}

impl ThreadsPost {
    /// True for single-image posts.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.media_type.as_deref() == Some("IMAGE")
    }
}

/// Envelope of a profile post listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostsPage {
    /// Posts on this page.
    #[serde(default)]
    pub data: Vec<ThreadsPost>,
}

/// Graph API error envelope: `{"error": {"message", "type", "code"}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub(crate) error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub(crate) message: String,
    #[serde(default, rename = "type")]
    pub(crate) kind: Option<String>,
    #[serde(default)]
    pub(crate) code: Option<i64>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
