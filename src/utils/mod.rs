//! Time helpers shared by the storage backends.

use chrono::{Local, Utc};

/// Current local date as `YYYY-MM-DD`, used in run-scoped file names.
pub fn current_date() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Current timestamp in milliseconds since the Unix epoch.
///
/// Stamped by the DB backend as `add_ts` on first insert and
/// `last_modify_ts` on every upsert.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
