//! Append-only CSV backend.
//!
//! One file set per crawl run, named `{count}_{crawler_type}_{kind}_{date}.csv`.
//! The run counter is computed once at construction by scanning existing file
//! names, so each run writes to its own files. Rows are never deduplicated:
//! repeated natural keys produce repeated rows, an explicit limitation of
//! this backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{self, CommentRecord, ContentRecord, CreatorRecord, StoreKind};
use crate::store::Store;
use crate::utils;

/// UTF-8 byte order mark, written first so spreadsheet tools pick the
/// right encoding.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Append-only CSV row writer.
pub struct CsvStore {
    store_dir: PathBuf,
    crawler_type: String,
    file_count: u32,
}

impl CsvStore {
    /// Create a CSV store rooted at the platform data directory, picking
    /// the next run counter from the file names already present.
    pub async fn new(config: &Config) -> Result<Self> {
        let store_dir = config.platform_dir();
        let file_count = next_run_counter(&store_dir).await?;
        Ok(Self {
            store_dir,
            crawler_type: config.crawler_type.clone(),
            file_count,
        })
    }

    fn save_file_path(&self, kind: StoreKind) -> PathBuf {
        self.store_dir.join(format!(
            "{}_{}_{}_{}.csv",
            self.file_count,
            self.crawler_type,
            kind.as_str(),
            utils::current_date()
        ))
    }

    async fn save_record<T: Serialize>(&self, record: &T, kind: StoreKind) -> Result<()> {
        tokio::fs::create_dir_all(&self.store_dir).await?;
        let path = self.save_file_path(kind);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        let is_empty = file.metadata().await?.len() == 0;

        let object = models::to_object(record)?;
        let mut buf: Vec<u8> = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut buf);
            if is_empty {
                writer.write_record(object.keys())?;
            }
            writer.write_record(object.values().map(csv_cell))?;
            writer.flush()?;
        }

        if is_empty {
            file.write_all(UTF8_BOM).await?;
        }
        file.write_all(&buf).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl Store for CsvStore {
    async fn store_content(&self, content: &ContentRecord) -> Result<()> {
        self.save_record(content, StoreKind::Contents).await
    }

    async fn store_comment(&self, comment: &CommentRecord) -> Result<()> {
        self.save_record(comment, StoreKind::Comments).await
    }

    async fn store_creator(&self, creator: &CreatorRecord) -> Result<()> {
        self.save_record(creator, StoreKind::Creator).await
    }
}

/// Render one JSON value as a CSV cell. Lists and nested objects become
/// JSON strings in their cell.
fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Next run counter for `dir`: maximum leading numeric prefix (before the
/// first `_`) of existing file names, plus one. A missing or empty
/// directory yields 1; non-numeric prefixes are skipped.
async fn next_run_counter(dir: &Path) -> Result<u32> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(1),
        Err(e) => return Err(AppError::Io(e)),
    };

    let mut max_seen = 0u32;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if let Some(prefix) = name.split('_').next() {
            if let Ok(count) = prefix.parse::<u32>() {
                max_seen = max_seen.max(count);
            }
        }
    }
    Ok(max_seen + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(tmp: &TempDir) -> Config {
        Config {
            data_root: tmp.path().to_path_buf(),
            ..Config::default()
        }
    }

    fn sample_content(id: &str) -> ContentRecord {
        ContentRecord {
            content_id: id.to_string(),
            title: Some("a, quoted \"title\"".to_string()),
            image_list: vec!["https://img.example.com/1.jpg".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_run_counter_empty_dir_is_one() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(next_run_counter(tmp.path()).await.unwrap(), 1);
        assert_eq!(next_run_counter(&tmp.path().join("absent")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_run_counter_continues_from_max_prefix() {
        let tmp = TempDir::new().unwrap();
        for name in ["3_search_contents_2026-08-01.csv", "5_search_comments_2026-08-02.csv"] {
            tokio::fs::write(tmp.path().join(name), b"").await.unwrap();
        }
        assert_eq!(next_run_counter(tmp.path()).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_run_counter_skips_non_numeric_prefixes() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("notes.txt"), b"").await.unwrap();
        assert_eq!(next_run_counter(tmp.path()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_header_written_once_then_rows_append() {
        let tmp = TempDir::new().unwrap();
        let store = CsvStore::new(&test_config(&tmp)).await.unwrap();

        store.store_content(&sample_content("n1")).await.unwrap();
        store.store_content(&sample_content("n2")).await.unwrap();

        let path = store.save_file_path(StoreKind::Contents);
        let bytes = tokio::fs::read(&path).await.unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("content_id,title,"));
        assert!(lines[1].contains("n1"));
        assert!(lines[2].contains("n2"));
        // Header never repeats
        assert!(!lines[2].contains("content_id,"));
    }

    #[tokio::test]
    async fn test_repeated_keys_produce_repeated_rows() {
        let tmp = TempDir::new().unwrap();
        let store = CsvStore::new(&test_config(&tmp)).await.unwrap();

        store.store_content(&sample_content("dup")).await.unwrap();
        store.store_content(&sample_content("dup")).await.unwrap();

        let path = store.save_file_path(StoreKind::Contents);
        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(text.matches("dup").count(), 2);
    }

    #[tokio::test]
    async fn test_kinds_write_to_separate_files() {
        let tmp = TempDir::new().unwrap();
        let store = CsvStore::new(&test_config(&tmp)).await.unwrap();

        store.store_content(&sample_content("n1")).await.unwrap();
        store
            .store_comment(&CommentRecord {
                comment_id: "c1".to_string(),
                content_id: "n1".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        store
            .store_creator(&CreatorRecord {
                user_id: "u1".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(store.save_file_path(StoreKind::Contents).exists());
        assert!(store.save_file_path(StoreKind::Comments).exists());
        assert!(store.save_file_path(StoreKind::Creator).exists());
    }

    #[tokio::test]
    async fn test_list_fields_serialized_as_json_cells() {
        let tmp = TempDir::new().unwrap();
        let store = CsvStore::new(&test_config(&tmp)).await.unwrap();
        store.store_content(&sample_content("n1")).await.unwrap();

        let path = store.save_file_path(StoreKind::Contents);
        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(text.contains("https://img.example.com/1.jpg"));
    }
}
