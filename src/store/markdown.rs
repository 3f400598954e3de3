//! Markdown/HTML rendering backend.
//!
//! Write-only: each content item becomes one Markdown document plus a
//! self-contained HTML companion, both named by the natural key and fully
//! rewritten on every call. Comments and creator profiles are not
//! materialized as standalone documents, so those operations are no-ops.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::Result;
use crate::models::{CommentRecord, ContentRecord, CreatorRecord};
use crate::render::{self, HtmlRenderer};
use crate::store::Store;

/// Per-item document renderer.
pub struct MarkdownStore {
    markdown_dir: PathBuf,
    html: HtmlRenderer,
}

impl MarkdownStore {
    pub fn new(config: &Config) -> Self {
        Self {
            markdown_dir: config.markdown_dir(),
            html: HtmlRenderer::new(config.html_dir()),
        }
    }

    async fn save_markdown(&self, content: &ContentRecord) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.markdown_dir).await?;
        let path = self.markdown_dir.join(format!("{}.md", content.content_id));
        tokio::fs::write(&path, render::content_to_markdown(content)).await?;
        log::info!("content {} saved to {:?}", content.content_id, path);
        Ok(path)
    }
}

#[async_trait]
impl Store for MarkdownStore {
    async fn store_content(&self, content: &ContentRecord) -> Result<()> {
        self.save_markdown(content).await?;
        self.html.render_to_file(content).await?;
        Ok(())
    }

    async fn store_comment(&self, _comment: &CommentRecord) -> Result<()> {
        Ok(())
    }

    async fn store_creator(&self, _creator: &CreatorRecord) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(tmp: &TempDir) -> Config {
        let _ = env_logger::builder().is_test(true).try_init();
        Config {
            data_root: tmp.path().to_path_buf(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_content_produces_markdown_and_html() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        let store = MarkdownStore::new(&config);

        store
            .store_content(&ContentRecord {
                content_id: "n1".to_string(),
                title: Some("Harbor lights".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let md = tokio::fs::read_to_string(config.markdown_dir().join("n1.md"))
            .await
            .unwrap();
        assert!(md.starts_with("# Harbor lights"));
        assert!(config.html_dir().join("n1.html").exists());
    }

    #[tokio::test]
    async fn test_missing_title_renders_placeholder() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        let store = MarkdownStore::new(&config);

        store
            .store_content(&ContentRecord {
                content_id: "bare".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let md = tokio::fs::read_to_string(config.markdown_dir().join("bare.md"))
            .await
            .unwrap();
        assert!(md.contains("no title"));
    }

    #[tokio::test]
    async fn test_second_call_overwrites_document() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        let store = MarkdownStore::new(&config);

        for title in ["first", "second"] {
            store
                .store_content(&ContentRecord {
                    content_id: "n1".to_string(),
                    title: Some(title.to_string()),
                    ..Default::default()
                })
                .await
                .unwrap();
        }

        let md = tokio::fs::read_to_string(config.markdown_dir().join("n1.md"))
            .await
            .unwrap();
        assert!(md.contains("second"));
        assert!(!md.contains("first"));
    }

    #[tokio::test]
    async fn test_comments_and_creators_are_noops() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        let store = MarkdownStore::new(&config);

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

        // No directories, no files
        assert!(!config.markdown_dir().exists());
    }
}
