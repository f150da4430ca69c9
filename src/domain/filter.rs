//! Keyword relevance filter for fetched posts.

use crate::threads::ThreadsPost;

/// Public accounts the updater pulls from, in fetch order.
pub const TARGET_ACCOUNTS: &[&str] = &["meta", "threads", "instagram", "facebook"];

/// Design and UI keywords a post must mention to be kept.
pub const DESIGN_KEYWORDS: &[&str] = &[
    "design",
    "ui",
    "ux",
    "interface",
    "user experience",
    "visual",
    "layout",
    "typography",
    "color",
    "brand",
    "creative",
    "aesthetic",
    "mockup",
    "prototype",
    "figma",
    "sketch",
    "adobe",
    "illustration",
    "graphic",
    "web design",
    "app design",
    "mobile design",
];

/// Case-insensitive substring matcher over a post's text and topic tag.
///
/// Matching is plain substring search, so `"ui"` also matches `"build"`.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    /// Creates a filter from arbitrary keywords. Blank keywords are dropped.
    #[must_use]
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// The fixed design keyword list.
    #[must_use]
    pub fn design() -> Self {
        Self::new(DESIGN_KEYWORDS)
    }

    /// Returns true when any keyword occurs in `"<content> <topic_tag>"`.
    #[must_use]
    pub fn matches(&self, content: &str, topic_tag: Option<&str>) -> bool {
        let haystack = format!("{content} {}", topic_tag.unwrap_or_default()).to_lowercase();
        self.keywords.iter().any(|k| haystack.contains(k.as_str()))
    }

    /// Applies [`KeywordFilter::matches`] to a raw post.
    #[must_use]
    pub fn matches_post(&self, post: &ThreadsPost) -> bool {
        self.matches(
            post.text.as_deref().unwrap_or_default(),
            post.topic_tag.as_deref(),
        )
    }
}

impl Default for KeywordFilter {
    fn default() -> Self {
        Self::design()
    }
}
