//! Storage backends and the router that selects one at startup.
//!
//! Every backend implements the same three-operation [`Store`] contract the
//! crawl pipeline calls into. The active variant is resolved exactly once
//! from configuration; there is no per-call re-dispatch and no component
//! calls back upstream.
//!
//! ## Output Layout
//!
//! ```text
//! {data_root}/{platform}/
//! ├── {count}_{crawler_type}_{kind}_{date}.csv   # CSV run files
//! ├── {platform}.db                              # SQLite store
//! ├── json/{crawler_type}_{kind}_{date}.json     # JSON array files
//! ├── words/{crawler_type}_{kind}_{date}.{json,svg}
//! ├── markdown/{content_id}.md
//! └── html/{content_id}.html
//! ```

pub mod csv;
pub mod db;
pub mod json;
pub mod markdown;

use async_trait::async_trait;

use crate::config::{Config, StoreOption};
use crate::error::Result;
use crate::models::{CommentRecord, ContentRecord, CreatorRecord};

// Re-export for convenience
pub use self::csv::CsvStore;
pub use self::db::SqliteStore;
pub use self::json::JsonStore;
pub use self::markdown::MarkdownStore;

/// Uniform persistence contract exposed to the crawl pipeline.
///
/// Each operation accepts one normalized record and returns `Ok(())` or a
/// propagated I/O failure; there is no other observable side effect.
#[async_trait]
pub trait Store: Send + Sync {
    /// Persist a content (post) record.
    async fn store_content(&self, content: &ContentRecord) -> Result<()>;

    /// Persist a comment record.
    async fn store_comment(&self, comment: &CommentRecord) -> Result<()>;

    /// Persist a creator profile record.
    async fn store_creator(&self, creator: &CreatorRecord) -> Result<()>;
}

/// Resolve the configured backend once, at process start.
pub async fn create_store(config: &Config) -> Result<Box<dyn Store>> {
    config.validate()?;
    let store: Box<dyn Store> = match config.save_data_option {
        StoreOption::Csv => Box::new(CsvStore::new(config).await?),
        StoreOption::Db => Box::new(SqliteStore::open(config).await?),
        StoreOption::Json => Box::new(JsonStore::new(config)),
        StoreOption::Markdown => Box::new(MarkdownStore::new(config)),
    };
    Ok(store)
}
