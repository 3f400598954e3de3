//! SQLite backend with upsert-by-natural-key semantics.
//!
//! The natural key is the sole identity: repeated calls with the same key
//! update the existing row in place. `add_ts` is stamped on first insert and
//! never touched again; `last_modify_ts` tracks the most recent upsert.
//! List fields are stored JSON-encoded in TEXT columns.

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::Result;
use crate::models::{CommentRecord, ContentRecord, CreatorRecord};
use crate::store::Store;
use crate::utils;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS content (
    content_id      TEXT PRIMARY KEY,
    title           TEXT,
    content         TEXT,
    nickname        TEXT,
    publish_time    TEXT,
    liked_count     TEXT NOT NULL DEFAULT '',
    comment_count   TEXT NOT NULL DEFAULT '',
    collected_count TEXT NOT NULL DEFAULT '',
    share_count     TEXT NOT NULL DEFAULT '',
    image_list      TEXT NOT NULL DEFAULT '[]',
    video_list      TEXT NOT NULL DEFAULT '[]',
    source_url      TEXT,
    add_ts          INTEGER NOT NULL,
    last_modify_ts  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS comment (
    comment_id        TEXT PRIMARY KEY,
    content_id        TEXT NOT NULL,
    nickname          TEXT,
    content           TEXT,
    publish_time      TEXT,
    like_count        TEXT NOT NULL DEFAULT '',
    sub_comment_count TEXT NOT NULL DEFAULT '',
    add_ts            INTEGER NOT NULL,
    last_modify_ts    INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS creator (
    user_id        TEXT PRIMARY KEY,
    nickname       TEXT,
    avatar         TEXT,
    "desc"         TEXT,
    ip_location    TEXT,
    follows        TEXT NOT NULL DEFAULT '',
    fans           TEXT NOT NULL DEFAULT '',
    interaction    TEXT NOT NULL DEFAULT '',
    add_ts         INTEGER NOT NULL,
    last_modify_ts INTEGER NOT NULL
);
"#;

/// Upsert-by-natural-key writer against a SQLite database.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the platform database and ensure the schema exists.
    pub async fn open(config: &Config) -> Result<Self> {
        tokio::fs::create_dir_all(config.platform_dir()).await?;
        let conn = Connection::open(config.db_path())?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn store_content(&self, content: &ContentRecord) -> Result<()> {
        let conn = self.conn.lock().await;
        // A lookup error propagates; only "no row" means absent.
        let existing: Option<i64> = conn
            .query_row(
                "SELECT add_ts FROM content WHERE content_id = ?1",
                params![content.content_id],
                |row| row.get(0),
            )
            .optional()?;

        let now = utils::current_timestamp_ms();
        let image_list = serde_json::to_string(&content.image_list)?;
        let video_list = serde_json::to_string(&content.video_list)?;
        if existing.is_none() {
            conn.execute(
                "INSERT INTO content (content_id, title, content, nickname, publish_time, \
                 liked_count, comment_count, collected_count, share_count, image_list, \
                 video_list, source_url, add_ts, last_modify_ts) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    content.content_id,
                    content.title,
                    content.content,
                    content.nickname,
                    content.publish_time,
                    content.liked_count,
                    content.comment_count,
                    content.collected_count,
                    content.share_count,
                    image_list,
                    video_list,
                    content.source_url,
                    now,
                    now,
                ],
            )?;
        } else {
            conn.execute(
                "UPDATE content SET title = ?2, content = ?3, nickname = ?4, \
                 publish_time = ?5, liked_count = ?6, comment_count = ?7, \
                 collected_count = ?8, share_count = ?9, image_list = ?10, \
                 video_list = ?11, source_url = ?12, last_modify_ts = ?13 \
                 WHERE content_id = ?1",
                params![
                    content.content_id,
                    content.title,
                    content.content,
                    content.nickname,
                    content.publish_time,
                    content.liked_count,
                    content.comment_count,
                    content.collected_count,
                    content.share_count,
                    image_list,
                    video_list,
                    content.source_url,
                    now,
                ],
            )?;
        }
        Ok(())
    }

    async fn store_comment(&self, comment: &CommentRecord) -> Result<()> {
        let conn = self.conn.lock().await;
        let existing: Option<i64> = conn
            .query_row(
                "SELECT add_ts FROM comment WHERE comment_id = ?1",
                params![comment.comment_id],
                |row| row.get(0),
            )
            .optional()?;

        let now = utils::current_timestamp_ms();
        if existing.is_none() {
            conn.execute(
                "INSERT INTO comment (comment_id, content_id, nickname, content, \
                 publish_time, like_count, sub_comment_count, add_ts, last_modify_ts) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    comment.comment_id,
                    comment.content_id,
                    comment.nickname,
                    comment.content,
                    comment.publish_time,
                    comment.like_count,
                    comment.sub_comment_count,
                    now,
                    now,
                ],
            )?;
        } else {
            conn.execute(
                "UPDATE comment SET content_id = ?2, nickname = ?3, content = ?4, \
                 publish_time = ?5, like_count = ?6, sub_comment_count = ?7, \
                 last_modify_ts = ?8 WHERE comment_id = ?1",
                params![
                    comment.comment_id,
                    comment.content_id,
                    comment.nickname,
                    comment.content,
                    comment.publish_time,
                    comment.like_count,
                    comment.sub_comment_count,
                    now,
                ],
            )?;
        }
        Ok(())
    }

    async fn store_creator(&self, creator: &CreatorRecord) -> Result<()> {
        let conn = self.conn.lock().await;
        let existing: Option<i64> = conn
            .query_row(
                "SELECT add_ts FROM creator WHERE user_id = ?1",
                params![creator.user_id],
                |row| row.get(0),
            )
            .optional()?;

        let now = utils::current_timestamp_ms();
        if existing.is_none() {
            conn.execute(
                "INSERT INTO creator (user_id, nickname, avatar, \"desc\", ip_location, \
                 follows, fans, interaction, add_ts, last_modify_ts) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    creator.user_id,
                    creator.nickname,
                    creator.avatar,
                    creator.desc,
                    creator.ip_location,
                    creator.follows,
                    creator.fans,
                    creator.interaction,
                    now,
                    now,
                ],
            )?;
        } else {
            conn.execute(
                "UPDATE creator SET nickname = ?2, avatar = ?3, \"desc\" = ?4, \
                 ip_location = ?5, follows = ?6, fans = ?7, interaction = ?8, \
                 last_modify_ts = ?9 WHERE user_id = ?1",
                params![
                    creator.user_id,
                    creator.nickname,
                    creator.avatar,
                    creator.desc,
                    creator.ip_location,
                    creator.follows,
                    creator.fans,
                    creator.interaction,
                    now,
                ],
            )?;
        }
        Ok(())
    }
}
