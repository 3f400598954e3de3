//! Lock-guarded JSON array backend.
//!
//! Each run-scoped file holds a single pretty-printed array. An append is a
//! full read-modify-write of the file: without serialization two concurrent
//! appends would race and the second writer's read would miss the first
//! writer's in-flight record, losing it on the whole-file rewrite. All
//! three operations therefore funnel through one instance-owned mutex held
//! for the entire cycle, including the word-cloud trigger.
//!
//! The rewrite goes through a temp file + rename, so the visible array is
//! valid JSON after every append even if the process dies mid-write.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{CommentRecord, ContentRecord, CreatorRecord, StoreKind};
use crate::store::Store;
use crate::utils;
use crate::words::WordFreqGenerator;

/// Whole-file JSON array accumulator.
pub struct JsonStore {
    json_dir: PathBuf,
    words_dir: PathBuf,
    crawler_type: String,
    wordcloud_enabled: bool,
    word_freq: WordFreqGenerator,
    lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(config: &Config) -> Self {
        Self {
            json_dir: config.json_dir(),
            words_dir: config.words_dir(),
            crawler_type: config.crawler_type.clone(),
            // Word clouds only make sense when comments are collected at all
            wordcloud_enabled: config.enable_get_comments && config.enable_get_wordcloud,
            word_freq: WordFreqGenerator::new(config.custom_words.clone()),
            lock: Mutex::new(()),
        }
    }

    /// Run-scoped array file and the matching word-artifact prefix.
    fn file_names(&self, kind: StoreKind) -> (PathBuf, PathBuf) {
        let stem = format!("{}_{}_{}", self.crawler_type, kind.as_str(), utils::current_date());
        (
            self.json_dir.join(format!("{stem}.json")),
            self.words_dir.join(stem),
        )
    }

    async fn save_record<T: Serialize>(&self, record: &T, kind: StoreKind) -> Result<()> {
        tokio::fs::create_dir_all(&self.json_dir).await?;
        let (save_path, words_prefix) = self.file_names(kind);

        // Critical section: read array, append, rewrite, trigger artifact.
        // Held until the write-back completes so a waiter never observes a
        // half-updated file.
        let _guard = self.lock.lock().await;

        let mut records: Vec<Value> = match tokio::fs::read(&save_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(AppError::Io(e)),
        };
        records.push(serde_json::to_value(record)?);
        write_json_atomic(&save_path, &records).await?;

        if self.wordcloud_enabled {
            // Best-effort: a word-cloud failure never rolls back the append.
            if let Err(e) = self.word_freq.generate(&records, &words_prefix).await {
                log::warn!("word cloud generation failed for {:?}: {}", words_prefix, e);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Store for JsonStore {
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

/// Write pretty-printed JSON via temp file + rename.
async fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(&bytes).await?;
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use tempfile::TempDir;

    fn test_config(tmp: &TempDir) -> Config {
        let _ = env_logger::builder().is_test(true).try_init();
        Config {
            data_root: tmp.path().to_path_buf(),
            ..Config::default()
        }
    }

    fn sample_comment(id: &str) -> CommentRecord {
        CommentRecord {
            comment_id: id.to_string(),
            content_id: "n1".to_string(),
            content: Some("nice shot".to_string()),
            ..Default::default()
        }
    }

    async fn read_array(path: &Path) -> Vec<Value> {
        let bytes = tokio::fs::read(path).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_appends_preserve_insertion_order() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::new(&test_config(&tmp));

        for id in ["c1", "c2", "c3"] {
            store.store_comment(&sample_comment(id)).await.unwrap();
        }

        let (path, _) = store.file_names(StoreKind::Comments);
        let records = read_array(&path).await;
        let ids: Vec<&str> = records
            .iter()
            .map(|r| r["comment_id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["c1", "c2", "c3"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_lose_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(JsonStore::new(&test_config(&tmp)));

        let mut handles = Vec::new();
        for i in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.store_comment(&sample_comment(&format!("c{i}"))).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let (path, _) = store.file_names(StoreKind::Comments);
        let records = read_array(&path).await;
        assert_eq!(records.len(), 32);

        let mut ids: Vec<String> = records
            .iter()
            .map(|r| r["comment_id"].as_str().unwrap().to_string())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 32);
    }

    #[tokio::test]
    async fn test_file_valid_json_after_each_append() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::new(&test_config(&tmp));
        let (path, _) = store.file_names(StoreKind::Contents);

        for n in 1..=3usize {
            store
                .store_content(&ContentRecord {
                    content_id: format!("n{n}"),
                    ..Default::default()
                })
                .await
                .unwrap();
            assert_eq!(read_array(&path).await.len(), n);
        }
    }

    #[tokio::test]
    async fn test_kinds_accumulate_in_separate_files() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::new(&test_config(&tmp));

        store
            .store_content(&ContentRecord {
                content_id: "n1".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        store.store_comment(&sample_comment("c1")).await.unwrap();

        let (contents, _) = store.file_names(StoreKind::Contents);
        let (comments, _) = store.file_names(StoreKind::Comments);
        assert_eq!(read_array(&contents).await.len(), 1);
        assert_eq!(read_array(&comments).await.len(), 1);
    }

    #[tokio::test]
    async fn test_wordcloud_artifacts_written_when_enabled() {
        let tmp = TempDir::new().unwrap();
        let config = Config {
            enable_get_wordcloud: true,
            ..test_config(&tmp)
        };
        let store = JsonStore::new(&config);

        store.store_comment(&sample_comment("c1")).await.unwrap();

        let (_, prefix) = store.file_names(StoreKind::Comments);
        assert!(prefix.with_extension("json").exists());
        assert!(prefix.with_extension("svg").exists());
    }

    #[tokio::test]
    async fn test_wordcloud_disabled_when_comments_off() {
        let tmp = TempDir::new().unwrap();
        let config = Config {
            enable_get_comments: false,
            enable_get_wordcloud: true,
            ..test_config(&tmp)
        };
        let store = JsonStore::new(&config);

        store.store_comment(&sample_comment("c1")).await.unwrap();

        let (path, prefix) = store.file_names(StoreKind::Comments);
        assert!(path.exists());
        assert!(!prefix.with_extension("json").exists());
    }
}
