//! Document renderers for content records.
//!
//! Pure functions: every missing optional field is substituted with a fixed
//! placeholder, so rendering never fails on absent data. Only genuine
//! filesystem errors surface from the file-writing wrappers.

use std::path::PathBuf;

use crate::error::Result;
use crate::models::ContentRecord;

/// Placeholders for absent optional fields.
pub const NO_TITLE: &str = "no title";
pub const NO_CONTENT: &str = "no content";
pub const UNKNOWN_AUTHOR: &str = "unknown author";
pub const UNKNOWN_TIME: &str = "unknown time";

fn field<'a>(value: &'a Option<String>, placeholder: &'a str) -> &'a str {
    value.as_deref().filter(|s| !s.is_empty()).unwrap_or(placeholder)
}

/// Render a content record as a Markdown document.
///
/// Section order: title, basic info (author / publish time / counters),
/// body, images, videos. Comments are not materialized here.
pub fn content_to_markdown(record: &ContentRecord) -> String {
    let title = field(&record.title, NO_TITLE);
    let author = field(&record.nickname, UNKNOWN_AUTHOR);
    let publish_time = field(&record.publish_time, UNKNOWN_TIME);
    let body = field(&record.content, NO_CONTENT);

    let mut doc = format!("# {title}\n\n");
    doc.push_str(&format!("**Author**: {author}  \n"));
    doc.push_str(&format!("**Published**: {publish_time}  \n"));
    doc.push_str(&format!(
        "**Likes**: {} | **Comments**: {} | **Collects**: {} | **Shares**: {}\n\n",
        record.liked_count, record.comment_count, record.collected_count, record.share_count
    ));
    doc.push_str(&format!("{body}\n"));

    if !record.image_list.is_empty() {
        doc.push_str("\n## Images\n\n");
        for url in &record.image_list {
            doc.push_str(&format!("![image]({url})\n\n"));
        }
    }
    if !record.video_list.is_empty() {
        doc.push_str("\n## Videos\n\n");
        for url in &record.video_list {
            doc.push_str(&format!("[video]({url})\n\n"));
        }
    }
    doc
}

/// Render a content record as a self-contained HTML document with inline
/// `<img>`/`<video>` tags built from the reference lists.
pub fn content_to_html(record: &ContentRecord) -> String {
    let title = escape_html(field(&record.title, NO_TITLE));
    let author = escape_html(field(&record.nickname, UNKNOWN_AUTHOR));
    let publish_time = escape_html(field(&record.publish_time, UNKNOWN_TIME));
    let body = escape_html(field(&record.content, NO_CONTENT));

    let images: String = record
        .image_list
        .iter()
        .map(|url| format!("<img src=\"{}\" />", escape_html(url)))
        .collect();
    let videos: String = record
        .video_list
        .iter()
        .map(|url| format!("<video src=\"{}\" controls></video>", escape_html(url)))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>
body {{ font-family: Arial, sans-serif; margin: 20px; }}
.post {{ border: 1px solid #ddd; padding: 20px; border-radius: 8px; }}
.title {{ font-size: 24px; font-weight: bold; margin-bottom: 10px; }}
.author {{ color: #666; margin-bottom: 10px; }}
.content {{ margin-bottom: 20px; white-space: pre-wrap; }}
.images img {{ max-width: 100%; height: auto; margin-bottom: 10px; }}
.videos video {{ max-width: 100%; height: auto; margin-bottom: 10px; }}
</style>
</head>
<body>
<div class="post">
<div class="title">{title}</div>
<div class="author">{author} | {publish_time}</div>
<div class="content">{body}</div>
<div class="images">{images}</div>
<div class="videos">{videos}</div>
</div>
</body>
</html>
"#
    )
}

/// Escape text for safe embedding in HTML/XML element and attribute context.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Writes self-contained HTML documents, one per content natural key.
pub struct HtmlRenderer {
    output_dir: PathBuf,
}

impl HtmlRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Render `record` to `{output_dir}/{content_id}.html`, creating the
    /// directory if absent. Overwrites any previous document for the key.
    pub async fn render_to_file(&self, record: &ContentRecord) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(format!("{}.html", record.content_id));
        tokio::fs::write(&path, content_to_html(record)).await?;
        log::info!("content {} rendered to {:?}", record.content_id, path);
        Ok(path)
    }
}
