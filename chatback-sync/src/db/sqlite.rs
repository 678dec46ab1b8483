//! SQLite database - schema definitions and connection management
//!
//! This file contains:
//! - Database struct definition
//! - Connection management (new, init)
//! - Schema creation
//! - Text column helpers that apply the storage encoding
//!
//! All table operations are in the tables/ subdirectory.

use rusqlite::types::Value;
use rusqlite::{Connection, Result as SqliteResult};
use std::path::Path;
use std::sync::Mutex;

use crate::encoding::StorageEncoding;

/// Main database wrapper; the Mutex serializes all access to one connection
pub struct Database {
    pub(crate) conn: Mutex<Connection>,
    encoding: StorageEncoding,
}

impl Database {
    /// Create a new database connection with UTF-8 storage and initialize
    /// the schema. ":memory:" opens a private in-memory database.
    pub fn new(database_url: &str) -> SqliteResult<Self> {
        Self::new_with_encoding(database_url, StorageEncoding::utf8())
    }

    /// Create a connection with an explicit storage encoding for text
    /// columns. The encoding must match the one the database was written
    /// with; there is no migration between encodings.
    pub fn new_with_encoding(database_url: &str, encoding: StorageEncoding) -> SqliteResult<Self> {
        let conn = if database_url == ":memory:" {
            Connection::open_in_memory()?
        } else {
            // Create parent directory if it doesn't exist
            if let Some(parent) = Path::new(database_url).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).ok();
                }
            }
            Connection::open(database_url)?
        };

        let db = Self {
            conn: Mutex::new(conn),
            encoding,
        };
        db.init()?;
        Ok(db)
    }

    pub fn storage_encoding(&self) -> StorageEncoding {
        self.encoding
    }

    /// Initialize all database tables and indexes
    fn init(&self) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();

        // Synced comments; the local id drives parent linkage and element ids
        conn.execute(
            "CREATE TABLE IF NOT EXISTS comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                remote_id INTEGER NOT NULL,
                parent_id INTEGER NOT NULL DEFAULT 0,
                channel TEXT NOT NULL,
                site_id INTEGER NOT NULL,
                author_id TEXT NOT NULL DEFAULT '',
                author_name TEXT NOT NULL DEFAULT '',
                author_email TEXT NOT NULL DEFAULT '',
                author_www TEXT,
                author_avatar TEXT,
                author_provider TEXT,
                rating INTEGER NOT NULL DEFAULT 0,
                created TEXT NOT NULL,
                ip TEXT NOT NULL DEFAULT '',
                message TEXT NOT NULL DEFAULT '',
                media TEXT NOT NULL DEFAULT '',
                status INTEGER NOT NULL DEFAULT 0,
                UNIQUE(site_id, remote_id)
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_comments_channel
             ON comments(site_id, channel, status)",
            [],
        )?;

        // Sync bookkeeping: "last_comment" cursor and "last_time" cron marker
        conn.execute(
            "CREATE TABLE IF NOT EXISTS key_value (
                name TEXT UNIQUE NOT NULL,
                value TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    // ============================================================
    // Storage encoding helpers
    //
    // Converted text columns hold UTF-8 text under the default encoding
    // and encoded bytes (stored as blobs) under a legacy one. Writers and
    // readers of those columns must go through these helpers.
    // ============================================================

    pub(crate) fn text_value(&self, text: &str) -> Value {
        if self.encoding.is_utf8() {
            Value::Text(text.to_string())
        } else {
            Value::Blob(self.encoding.encode_field(text))
        }
    }

    pub(crate) fn opt_text_value(&self, text: Option<&str>) -> Value {
        match text {
            Some(text) => self.text_value(text),
            None => Value::Null,
        }
    }

    pub(crate) fn text_column(&self, row: &rusqlite::Row<'_>, idx: usize) -> SqliteResult<String> {
        if self.encoding.is_utf8() {
            row.get(idx)
        } else {
            let bytes: Vec<u8> = row.get(idx)?;
            Ok(self.encoding.decode_field(&bytes))
        }
    }

    pub(crate) fn opt_text_column(
        &self,
        row: &rusqlite::Row<'_>,
        idx: usize,
    ) -> SqliteResult<Option<String>> {
        if self.encoding.is_utf8() {
            row.get(idx)
        } else {
            let bytes: Option<Vec<u8>> = row.get(idx)?;
            Ok(bytes.map(|b| self.encoding.decode_field(&b)))
        }
    }
}
