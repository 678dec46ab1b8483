//! Sync cursor and cron marker, stored in the key_value table

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Result as SqliteResult};

use super::super::Database;

pub(crate) const CURSOR_KEY: &str = "last_comment";
const CRON_KEY: &str = "last_time";

impl Database {
    /// Highest remote id recorded by a committed sync write; None until
    /// the cursor row has been created
    pub fn last_synced_remote_id(&self) -> SqliteResult<Option<i64>> {
        Ok(self.kv_value(CURSOR_KEY)?.and_then(|v| v.parse().ok()))
    }

    /// Create the cursor row at 0; an existing row is left untouched
    pub fn init_sync_cursor(&self) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO key_value (name, value) VALUES (?1, '0')",
            params![CURSOR_KEY],
        )?;
        Ok(())
    }

    /// Check-and-set throttle for automatic sync. The first call ever
    /// creates the marker and reports due. Later calls report due only
    /// once the interval has elapsed, updating the marker when they do;
    /// a not-due call never mutates it. The whole check runs under the
    /// connection lock, so in-process callers cannot race each other.
    pub fn cron_gate_due(&self, interval_secs: i64) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().timestamp();

        let marker: Option<String> = conn
            .query_row(
                "SELECT value FROM key_value WHERE name = ?1",
                params![CRON_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match marker {
            None => {
                conn.execute(
                    "INSERT OR IGNORE INTO key_value (name, value) VALUES (?1, ?2)",
                    params![CRON_KEY, now.to_string()],
                )?;
                Ok(true)
            }
            Some(value) => {
                // an unreadable marker counts as long overdue
                let last = value.parse::<i64>().unwrap_or(0);
                if last + interval_secs > now {
                    Ok(false)
                } else {
                    conn.execute(
                        "UPDATE key_value SET value = ?1 WHERE name = ?2",
                        params![now.to_string(), CRON_KEY],
                    )?;
                    Ok(true)
                }
            }
        }
    }

    fn kv_value(&self, name: &str) -> SqliteResult<Option<String>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT value FROM key_value WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()
    }
}
