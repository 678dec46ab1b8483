use serde::{Deserialize, Serialize};

/// Moderation status as stored in the comments table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Spam,
    Deleted,
}

impl CommentStatus {
    pub fn as_i64(&self) -> i64 {
        match self {
            CommentStatus::Pending => 0,
            CommentStatus::Approved => 1,
            CommentStatus::Rejected => 2,
            CommentStatus::Spam => 3,
            CommentStatus::Deleted => 4,
        }
    }

    /// Unknown stored values fall back to pending
    pub fn from_i64(value: i64) -> Self {
        match value {
            1 => CommentStatus::Approved,
            2 => CommentStatus::Rejected,
            3 => CommentStatus::Spam,
            4 => CommentStatus::Deleted,
            _ => CommentStatus::Pending,
        }
    }

    /// Map a remote textual status, case-insensitively. Anything outside
    /// the known set (including "pending" and empty) maps to pending.
    pub fn from_remote(text: &str) -> Self {
        match text.to_lowercase().as_str() {
            "approved" => CommentStatus::Approved,
            "rejected" => CommentStatus::Rejected,
            "spam" => CommentStatus::Spam,
            "deleted" => CommentStatus::Deleted,
            _ => CommentStatus::Pending,
        }
    }
}

/// Comment row as stored locally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Local id, assigned on insert; parent linkage and element ids use it
    pub id: i64,
    /// Id assigned by the remote service, stable across syncs
    pub remote_id: i64,
    /// Local id of the parent comment; 0 = top-level or parent not synced
    pub parent_id: i64,
    pub channel: String,
    pub site_id: i64,
    pub author_id: String,
    pub author_name: String,
    pub author_email: String,
    pub author_www: Option<String>,
    pub author_avatar: Option<String>,
    pub author_provider: Option<String>,
    pub rating: i64,
    /// Local wall-clock string, YYYY-MM-DD HH:MM:SS
    pub created: String,
    pub ip: String,
    pub message: String,
    pub media: String,
    pub status: CommentStatus,
}

/// Fields for a comment about to be persisted by a sync round
#[derive(Debug, Clone)]
pub struct NewComment {
    pub remote_id: i64,
    pub parent_id: i64,
    pub channel: String,
    pub site_id: i64,
    pub author_id: String,
    pub author_name: String,
    pub author_email: String,
    pub author_www: Option<String>,
    pub author_avatar: Option<String>,
    pub author_provider: Option<String>,
    pub rating: i64,
    pub created: String,
    pub ip: String,
    pub message: String,
    pub media: String,
    pub status: CommentStatus,
}
