//! Comment table operations

use rusqlite::{params, OptionalExtension, Result as SqliteResult};

use super::super::Database;
use super::sync_state::CURSOR_KEY;
use crate::models::{Comment, CommentStatus, NewComment};

impl Database {
    /// Local id of a previously synced comment, looked up by remote id
    pub fn find_comment_by_remote_id(
        &self,
        site_id: i64,
        remote_id: i64,
    ) -> SqliteResult<Option<i64>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id FROM comments WHERE site_id = ?1 AND remote_id = ?2",
            params![site_id, remote_id],
            |row| row.get(0),
        )
        .optional()
    }

    /// Insert one synced comment and advance the sync cursor to its remote
    /// id, in a single transaction. Returns the new local id, or None when
    /// the (site_id, remote_id) pair was already present; the cursor
    /// advances either way, so a resumed sync moves past known rows.
    pub fn insert_synced_comment(&self, comment: &NewComment) -> SqliteResult<Option<i64>> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO comments (
                remote_id, parent_id, channel, site_id,
                author_id, author_name, author_email, author_www,
                author_avatar, author_provider, rating, created,
                ip, message, media, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                comment.remote_id,
                comment.parent_id,
                self.text_value(&comment.channel),
                comment.site_id,
                comment.author_id,
                self.text_value(&comment.author_name),
                self.text_value(&comment.author_email),
                self.opt_text_value(comment.author_www.as_deref()),
                self.opt_text_value(comment.author_avatar.as_deref()),
                self.opt_text_value(comment.author_provider.as_deref()),
                comment.rating,
                comment.created,
                comment.ip,
                self.text_value(&comment.message),
                self.text_value(&comment.media),
                comment.status.as_i64(),
            ],
        )?;

        let local_id = if inserted > 0 {
            Some(tx.last_insert_rowid())
        } else {
            None
        };

        tx.execute(
            "UPDATE key_value SET value = ?1 WHERE name = ?2",
            params![comment.remote_id.to_string(), CURSOR_KEY],
        )?;

        tx.commit()?;
        Ok(local_id)
    }

    /// Approved comments for one site/channel in primary-key order
    pub fn approved_comments(&self, site_id: i64, channel: &str) -> SqliteResult<Vec<Comment>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, remote_id, parent_id, channel, site_id,
                    author_id, author_name, author_email, author_www,
                    author_avatar, author_provider, rating, created,
                    ip, message, media, status
             FROM comments
             WHERE site_id = ?1 AND channel = ?2 AND status = ?3
             ORDER BY id",
        )?;

        let comments = stmt
            .query_map(
                params![
                    site_id,
                    self.text_value(channel),
                    CommentStatus::Approved.as_i64()
                ],
                |row| self.row_to_comment(row),
            )?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(comments)
    }

    /// Total number of stored comments across all sites and channels
    pub fn comment_count(&self) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM comments", [], |row| row.get(0))
    }

    fn row_to_comment(&self, row: &rusqlite::Row<'_>) -> SqliteResult<Comment> {
        Ok(Comment {
            id: row.get(0)?,
            remote_id: row.get(1)?,
            parent_id: row.get(2)?,
            channel: self.text_column(row, 3)?,
            site_id: row.get(4)?,
            author_id: row.get(5)?,
            author_name: self.text_column(row, 6)?,
            author_email: self.text_column(row, 7)?,
            author_www: self.opt_text_column(row, 8)?,
            author_avatar: self.opt_text_column(row, 9)?,
            author_provider: self.opt_text_column(row, 10)?,
            rating: row.get(11)?,
            created: row.get(12)?,
            ip: row.get(13)?,
            message: self.text_column(row, 14)?,
            media: self.text_column(row, 15)?,
            status: CommentStatus::from_i64(row.get(16)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;
    use crate::encoding::StorageEncoding;
    use crate::models::{CommentStatus, NewComment};

    fn test_db() -> Database {
        let db = Database::new(":memory:").unwrap();
        db.init_sync_cursor().unwrap();
        db
    }

    fn sample(remote_id: i64, parent_id: i64, status: CommentStatus) -> NewComment {
        NewComment {
            remote_id,
            parent_id,
            channel: "/post".to_string(),
            site_id: 1,
            author_id: "42".to_string(),
            author_name: "ann".to_string(),
            author_email: "ann@example.com".to_string(),
            author_www: None,
            author_avatar: None,
            author_provider: None,
            rating: 0,
            created: "2024-01-15 10:30:00".to_string(),
            ip: "10.0.0.1".to_string(),
            message: format!("message {}", remote_id),
            media: String::new(),
            status,
        }
    }

    #[test]
    fn test_insert_returns_local_id_and_advances_cursor() {
        let db = test_db();

        let first = db
            .insert_synced_comment(&sample(101, 0, CommentStatus::Approved))
            .unwrap();
        assert!(first.is_some());
        assert_eq!(db.last_synced_remote_id().unwrap(), Some(101));

        let second = db
            .insert_synced_comment(&sample(102, 0, CommentStatus::Pending))
            .unwrap();
        assert!(second.unwrap() > first.unwrap());
        assert_eq!(db.last_synced_remote_id().unwrap(), Some(102));
    }

    #[test]
    fn test_duplicate_remote_id_is_ignored() {
        let db = test_db();

        db.insert_synced_comment(&sample(7, 0, CommentStatus::Approved))
            .unwrap();
        let repeat = db
            .insert_synced_comment(&sample(7, 0, CommentStatus::Approved))
            .unwrap();

        assert_eq!(repeat, None);
        assert_eq!(db.comment_count().unwrap(), 1);
        // cursor still moves past the known row
        assert_eq!(db.last_synced_remote_id().unwrap(), Some(7));
    }

    #[test]
    fn test_same_remote_id_on_another_site_inserts() {
        let db = test_db();

        db.insert_synced_comment(&sample(7, 0, CommentStatus::Approved))
            .unwrap();
        let mut other_site = sample(7, 0, CommentStatus::Approved);
        other_site.site_id = 2;

        assert!(db.insert_synced_comment(&other_site).unwrap().is_some());
        assert_eq!(db.comment_count().unwrap(), 2);
    }

    #[test]
    fn test_find_comment_by_remote_id_scopes_by_site() {
        let db = test_db();

        let local = db
            .insert_synced_comment(&sample(55, 0, CommentStatus::Approved))
            .unwrap()
            .unwrap();

        assert_eq!(db.find_comment_by_remote_id(1, 55).unwrap(), Some(local));
        assert_eq!(db.find_comment_by_remote_id(2, 55).unwrap(), None);
        assert_eq!(db.find_comment_by_remote_id(1, 56).unwrap(), None);
    }

    #[test]
    fn test_approved_comments_filters_and_orders() {
        let db = test_db();

        db.insert_synced_comment(&sample(1, 0, CommentStatus::Approved))
            .unwrap();
        db.insert_synced_comment(&sample(2, 0, CommentStatus::Pending))
            .unwrap();
        db.insert_synced_comment(&sample(3, 0, CommentStatus::Spam))
            .unwrap();
        db.insert_synced_comment(&sample(4, 0, CommentStatus::Approved))
            .unwrap();

        let mut off_channel = sample(5, 0, CommentStatus::Approved);
        off_channel.channel = "/other".to_string();
        db.insert_synced_comment(&off_channel).unwrap();

        let comments = db.approved_comments(1, "/post").unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].remote_id, 1);
        assert_eq!(comments[1].remote_id, 4);
        assert!(comments[0].id < comments[1].id);
        assert_eq!(comments[0].status, CommentStatus::Approved);
    }

    #[test]
    fn test_nullable_author_fields_round_trip() {
        let db = test_db();

        let mut full = sample(9, 0, CommentStatus::Approved);
        full.author_www = Some("https://ann.example".to_string());
        full.author_avatar = Some("https://ann.example/a.png".to_string());
        full.author_provider = Some("twitter".to_string());
        db.insert_synced_comment(&full).unwrap();

        let comments = db.approved_comments(1, "/post").unwrap();
        assert_eq!(comments[0].author_www.as_deref(), Some("https://ann.example"));
        assert_eq!(comments[0].author_provider.as_deref(), Some("twitter"));
        assert_eq!(comments[0].author_avatar.as_deref(), Some("https://ann.example/a.png"));
    }

    #[test]
    fn test_legacy_encoding_round_trip_stores_encoded_bytes() {
        let encoding = StorageEncoding::from_label("windows-1251").unwrap();
        let db = Database::new_with_encoding(":memory:", encoding).unwrap();
        db.init_sync_cursor().unwrap();

        let mut comment = sample(1, 0, CommentStatus::Approved);
        comment.message = "Привет".to_string();
        comment.author_name = "Аня".to_string();
        db.insert_synced_comment(&comment).unwrap();

        let stored = db.approved_comments(1, "/post").unwrap();
        assert_eq!(stored[0].message, "Привет");
        assert_eq!(stored[0].author_name, "Аня");

        // at rest the column holds windows-1251 bytes, not UTF-8
        let conn = db.conn.lock().unwrap();
        let raw: Vec<u8> = conn
            .query_row(
                "SELECT message FROM comments WHERE remote_id = 1",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(raw, encoding.encode_field("Привет"));
        assert_ne!(raw, "Привет".as_bytes());
    }
}
