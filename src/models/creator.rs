//! Creator (profile) record.

use serde::{Deserialize, Serialize};

/// A normalized creator profile.
///
/// `user_id` is the natural key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorRecord {
    /// Natural key (user id)
    pub user_id: String,

    /// Display name
    #[serde(default)]
    pub nickname: Option<String>,

    /// Avatar image URL
    #[serde(default)]
    pub avatar: Option<String>,

    /// Profile description
    #[serde(default)]
    pub desc: Option<String>,

    /// Self-reported location
    #[serde(default)]
    pub ip_location: Option<String>,

    /// Profile counters
    #[serde(default)]
    pub follows: String,
    #[serde(default)]
    pub fans: String,
    #[serde(default)]
    pub interaction: String,
}
