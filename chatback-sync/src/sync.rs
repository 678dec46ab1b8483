//! Sync orchestration between the remote comment service and local storage

use std::sync::Arc;

use chrono::{Local, TimeZone};

use crate::api::{decode_comment_list, ChatbackClient};
use crate::db::Database;
use crate::models::{CommentStatus, NewComment};
use crate::render;

/// Adapter facade: pulls comments for one site into the local store and
/// renders the cached ones. Construction performs no I/O; callers that
/// want the legacy construct-and-sync behavior call `maybe_auto_sync`
/// right after.
pub struct ChatbackSync {
    site_id: i64,
    db: Arc<Database>,
    client: ChatbackClient,
    auto_sync_secs: i64,
}

impl ChatbackSync {
    pub fn new(
        site_id: i64,
        db: Arc<Database>,
        account_api_key: &str,
        site_api_key: &str,
        auto_sync_secs: i64,
    ) -> Result<Self, String> {
        Self::new_with_api_base(site_id, db, account_api_key, site_api_key, auto_sync_secs, None)
    }

    pub fn new_with_api_base(
        site_id: i64,
        db: Arc<Database>,
        account_api_key: &str,
        site_api_key: &str,
        auto_sync_secs: i64,
        api_base: Option<&str>,
    ) -> Result<Self, String> {
        let client = ChatbackClient::new_with_api_base(account_api_key, site_api_key, api_base)?;
        Ok(Self {
            site_id,
            db,
            client,
            auto_sync_secs,
        })
    }

    pub fn site_id(&self) -> i64 {
        self.site_id
    }

    /// Pull comments newer than the stored cursor and persist them.
    /// Returns the number of newly stored rows. Err covers transport
    /// failures, undecodable bodies, and an empty comment list alike:
    /// nothing was synced this round, and the next round retries from the
    /// last committed cursor.
    pub async fn sync_comments(&self) -> Result<usize, String> {
        let since = match self
            .db
            .last_synced_remote_id()
            .map_err(|e| format!("Failed to read sync cursor: {}", e))?
        {
            Some(id) => Some(id),
            None => {
                // first run: create the cursor row and fetch unfiltered
                self.db
                    .init_sync_cursor()
                    .map_err(|e| format!("Failed to create sync cursor: {}", e))?;
                None
            }
        };

        let body = self.client.fetch_comment_list(since).await?;
        let decoded = decode_comment_list(&body)
            .ok_or_else(|| "Comment list response was not decodable".to_string())?;

        if decoded.comments.is_empty() {
            return Err("No new comments".to_string());
        }

        let mut inserted = 0usize;
        for remote in &decoded.comments {
            let status = CommentStatus::from_remote(&remote.status);
            let author = remote.effective_author();

            // Parent linkage uses local ids. A parent not yet stored
            // (including one later in the same batch) resolves to 0.
            let parent_id = if remote.parent_id != 0 {
                self.db
                    .find_comment_by_remote_id(remote.site_id, remote.parent_id)
                    .map_err(|e| format!("Parent lookup failed for comment {}: {}", remote.id, e))?
                    .unwrap_or(0)
            } else {
                0
            };

            let new_comment = NewComment {
                remote_id: remote.id,
                parent_id,
                channel: remote.channel.clone(),
                site_id: remote.site_id,
                author_id: author.id,
                author_name: author.name,
                author_email: author.email,
                author_www: author.www,
                author_avatar: author.avatar,
                author_provider: author.provider,
                rating: remote.rating,
                created: local_timestamp(remote.created),
                ip: remote.ip.clone(),
                message: remote.message.clone(),
                media: remote.media.clone(),
                status,
            };

            match self
                .db
                .insert_synced_comment(&new_comment)
                .map_err(|e| format!("Failed to store comment {}: {}", remote.id, e))?
            {
                Some(local_id) => {
                    inserted += 1;
                    log::debug!("[SYNC] stored comment {} as local id {}", remote.id, local_id);
                }
                None => {
                    log::debug!("[SYNC] comment {} already present, skipped", remote.id);
                }
            }
        }

        log::info!(
            "[SYNC] site {}: {} of {} fetched comments stored",
            self.site_id,
            inserted,
            decoded.comments.len()
        );
        Ok(inserted)
    }

    /// Run a sync when the configured interval allows it. Returns Ok(None)
    /// when auto-sync is disabled, credentials are missing, or the cron
    /// gate is not due; otherwise the result of the sync itself.
    pub async fn maybe_auto_sync(&self) -> Result<Option<usize>, String> {
        if self.auto_sync_secs <= 0 || !self.client.has_credentials() {
            return Ok(None);
        }

        let due = self
            .db
            .cron_gate_due(self.auto_sync_secs)
            .map_err(|e| format!("Cron gate check failed: {}", e))?;
        if !due {
            log::debug!("[SYNC] auto-sync not due for site {}", self.site_id);
            return Ok(None);
        }

        self.sync_comments().await.map(Some)
    }

    /// Widget container with inline cached comments and the loader script
    pub fn render_widget(&self, channel: &str) -> String {
        render::widget_html(self.site_id, channel, &self.render_comments(channel))
    }

    /// Inline HTML for the approved comments of one channel. Storage
    /// errors never surface here; they log and render as an empty section.
    pub fn render_comments(&self, channel: &str) -> String {
        match self.db.approved_comments(self.site_id, channel) {
            Ok(comments) => render::comment_list_html(&comments),
            Err(e) => {
                log::warn!(
                    "[RENDER] failed to load comments for channel {}: {}",
                    channel,
                    e
                );
                String::new()
            }
        }
    }
}

/// Remote creation time arrives as epoch milliseconds; stored as a local
/// wall-clock string
fn local_timestamp(epoch_ms: i64) -> String {
    Local
        .timestamp_millis_opt(epoch_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
