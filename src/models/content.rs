//! Content (post) record.

use serde::{Deserialize, Serialize};

/// A normalized content item scraped from a platform.
///
/// `content_id` is the natural key, unique within a store's lifetime.
/// Engagement counters are kept as display strings exactly as scraped
/// (platforms report values like `"1.2k"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Natural key (post id)
    pub content_id: String,

    /// Post title
    #[serde(default)]
    pub title: Option<String>,

    /// Post body text
    #[serde(default)]
    pub content: Option<String>,

    /// Author display name
    #[serde(default)]
    pub nickname: Option<String>,

    /// Publish time as displayed by the platform
    #[serde(default)]
    pub publish_time: Option<String>,

    /// Engagement counters
    #[serde(default)]
    pub liked_count: String,
    #[serde(default)]
    pub comment_count: String,
    #[serde(default)]
    pub collected_count: String,
    #[serde(default)]
    pub share_count: String,

    /// Image URL references
    #[serde(default)]
    pub image_list: Vec<String>,

    /// Video URL references
    #[serde(default)]
    pub video_list: Vec<String>,

    /// Canonical URL of the post
    #[serde(default)]
    pub source_url: Option<String>,
}
