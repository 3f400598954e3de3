//! Comment record.

use serde::{Deserialize, Serialize};

/// A normalized comment on a content item.
///
/// `comment_id` is the natural key; `content_id` references the owning
/// content item's natural key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Natural key (comment id)
    pub comment_id: String,

    /// Natural key of the content this comment belongs to
    pub content_id: String,

    /// Author display name
    #[serde(default)]
    pub nickname: Option<String>,

    /// Comment body text
    #[serde(default)]
    pub content: Option<String>,

    /// Publish time as displayed by the platform
    #[serde(default)]
    pub publish_time: Option<String>,

    /// Engagement counters
    #[serde(default)]
    pub like_count: String,
    #[serde(default)]
    pub sub_comment_count: String,
}
