// src/words.rs

//! Word-frequency artifacts derived from accumulated JSON records.
//!
//! Invoked best-effort by the JSON backend: tokenizes the text fields of the
//! accumulated array, folds tokens through a custom word -> group mapping,
//! and writes a frequency map plus a simple SVG cloud image. Callers treat
//! any failure here as non-fatal.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;
use crate::render::escape_html;

/// Record fields inspected for tokenizable text.
const TEXT_FIELDS: [&str; 2] = ["content", "title"];

/// Tokens excluded from frequency counts.
const STOP_WORDS: [&str; 32] = [
    "the", "a", "an", "and", "or", "of", "to", "in", "on", "at", "is", "are",
    "was", "were", "be", "it", "for", "with", "this", "that", "as", "by",
    "from", "not", "no", "but", "so", "if", "we", "you", "they", "have",
];

/// Maximum number of words drawn into the SVG cloud.
const CLOUD_WORD_LIMIT: usize = 50;

/// Computes word frequencies and writes the derived artifacts.
pub struct WordFreqGenerator {
    custom_words: HashMap<String, String>,
}

impl WordFreqGenerator {
    /// Create a generator with a custom word -> group mapping.
    pub fn new(custom_words: HashMap<String, String>) -> Self {
        Self { custom_words }
    }

    /// Count token frequencies across the text fields of `records`,
    /// descending by count, ties broken alphabetically.
    pub fn word_frequencies(&self, records: &[Value]) -> Vec<(String, usize)> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for record in records {
            let Some(object) = record.as_object() else {
                continue;
            };
            for fieldname in TEXT_FIELDS {
                let Some(text) = object.get(fieldname).and_then(Value::as_str) else {
                    continue;
                };
                for word in text.unicode_words() {
                    let token = word.to_lowercase();
                    if STOP_WORDS.contains(&token.as_str()) {
                        continue;
                    }
                    // Ideographic scripts segment into single-character
                    // words, so the minimum length applies to ASCII only.
                    if token.chars().count() < 2 && token.is_ascii() {
                        continue;
                    }
                    let token = self.custom_words.get(&token).cloned().unwrap_or(token);
                    *counts.entry(token).or_default() += 1;
                }
            }
        }
        let mut frequencies: Vec<(String, usize)> = counts.into_iter().collect();
        frequencies.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        frequencies
    }

    /// Write `{prefix}.json` (frequency map, descending) and `{prefix}.svg`
    /// (cloud image) for the accumulated `records`.
    pub async fn generate(&self, records: &[Value], file_prefix: &Path) -> Result<()> {
        if let Some(parent) = file_prefix.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let frequencies = self.word_frequencies(records);

        let mut map = serde_json::Map::new();
        for (word, count) in &frequencies {
            map.insert(word.clone(), Value::from(*count));
        }
        let json_path = file_prefix.with_extension("json");
        tokio::fs::write(&json_path, serde_json::to_vec_pretty(&map)?).await?;

        let svg_path = file_prefix.with_extension("svg");
        tokio::fs::write(&svg_path, render_svg_cloud(&frequencies)).await?;

        log::info!(
            "word frequencies written: {} distinct tokens to {:?}",
            frequencies.len(),
            json_path
        );
        Ok(())
    }
}

/// Render frequencies as a simple vertical cloud, font size scaled by count.
fn render_svg_cloud(frequencies: &[(String, usize)]) -> String {
    let max_count = frequencies.first().map_or(1, |(_, c)| (*c).max(1));
    let mut body = String::new();
    let mut y = 10usize;
    for (word, count) in frequencies.iter().take(CLOUD_WORD_LIMIT) {
        let size = 12 + 28 * count / max_count;
        y += size + 8;
        body.push_str(&format!(
            "  <text x=\"20\" y=\"{y}\" font-size=\"{size}\">{}</text>\n",
            escape_html(word)
        ));
    }
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"800\" height=\"{}\">\n{body}</svg>\n",
        y + 20
    )
}
