// src/config.rs

//! Storage configuration.
//!
//! The backend is selected once from configuration at process start and
//! stays fixed for the process lifetime. An unknown `save_data_option`
//! string fails TOML deserialization, which callers treat as a fatal
//! startup error.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Closed enumeration of storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreOption {
    Csv,
    Db,
    Json,
    Markdown,
}

/// Root storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active storage backend
    #[serde(default = "defaults::save_data_option")]
    pub save_data_option: StoreOption,

    /// Crawl mode context value used in output file names
    /// (e.g. "search", "detail", "creator")
    #[serde(default = "defaults::crawler_type")]
    pub crawler_type: String,

    /// Platform slug, names the per-platform output directory
    #[serde(default = "defaults::platform")]
    pub platform: String,

    /// Base output directory
    #[serde(default = "defaults::data_root")]
    pub data_root: PathBuf,

    /// Whether the pipeline collects comments at all
    #[serde(default = "defaults::enable_get_comments")]
    pub enable_get_comments: bool,

    /// Whether the JSON backend triggers word-cloud generation
    #[serde(default)]
    pub enable_get_wordcloud: bool,

    /// Custom word -> group mapping folded into word frequencies
    #[serde(default)]
    pub custom_words: HashMap<String, String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.platform.trim().is_empty() {
            return Err(AppError::validation("platform is empty"));
        }
        if self.crawler_type.trim().is_empty() {
            return Err(AppError::validation("crawler_type is empty"));
        }
        if self.data_root.as_os_str().is_empty() {
            return Err(AppError::validation("data_root is empty"));
        }
        Ok(())
    }

    /// Per-platform output directory; CSV run files live directly here.
    pub fn platform_dir(&self) -> PathBuf {
        self.data_root.join(&self.platform)
    }

    /// Directory for run-scoped JSON array files.
    pub fn json_dir(&self) -> PathBuf {
        self.platform_dir().join("json")
    }

    /// Directory for word-frequency artifacts.
    pub fn words_dir(&self) -> PathBuf {
        self.platform_dir().join("words")
    }

    /// Directory for rendered Markdown documents.
    pub fn markdown_dir(&self) -> PathBuf {
        self.platform_dir().join("markdown")
    }

    /// Directory for rendered HTML documents.
    pub fn html_dir(&self) -> PathBuf {
        self.platform_dir().join("html")
    }

    /// SQLite database file path.
    pub fn db_path(&self) -> PathBuf {
        self.platform_dir().join(format!("{}.db", self.platform))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_data_option: defaults::save_data_option(),
            crawler_type: defaults::crawler_type(),
            platform: defaults::platform(),
            data_root: defaults::data_root(),
            enable_get_comments: defaults::enable_get_comments(),
            enable_get_wordcloud: false,
            custom_words: HashMap::new(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use super::StoreOption;

    pub fn save_data_option() -> StoreOption {
        StoreOption::Json
    }

    pub fn crawler_type() -> String {
        "search".to_string()
    }

    pub fn platform() -> String {
        "xhs".to_string()
    }

    pub fn data_root() -> PathBuf {
        PathBuf::from("data")
    }

    pub fn enable_get_comments() -> bool {
        true
    }
}
