// src/lib.rs

//! Persistence layer for crawled social-media records.
//!
//! The crawl pipeline hands normalized content, comment and creator records
//! to a single [`store::Store`] selected at startup; the active backend
//! turns them into durable artifacts (CSV rows, SQLite rows, JSON arrays,
//! rendered Markdown/HTML documents).

pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod store;
pub mod utils;
pub mod words;
