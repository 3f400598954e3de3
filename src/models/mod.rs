//! Normalized entity records handed to the storage layer.
//!
//! Records are produced by the crawl pipeline, passed once to a store
//! operation and never mutated by the core itself. Optional fields may be
//! absent in scraped data; rendering backends substitute fixed placeholders
//! for them, other backends persist them as-is.

mod comment;
mod content;
mod creator;

pub use comment::CommentRecord;
pub use content::ContentRecord;
pub use creator::CreatorRecord;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AppError, Result};

/// Record kind being stored; names the run-scoped output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Contents,
    Comments,
    Creator,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Contents => "contents",
            StoreKind::Comments => "comments",
            StoreKind::Creator => "creator",
        }
    }
}

/// Serialize a record into a JSON object.
///
/// With `serde_json`'s `preserve_order` feature the map keeps struct field
/// insertion order, which fixes CSV header/row ordering.
pub fn to_object<T: Serialize>(record: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::record(format!(
            "expected an object record, got {other}"
        ))),
    }
}
