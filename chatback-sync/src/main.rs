use dotenv::dotenv;
use std::sync::Arc;

use chatback_sync::config::Config;
use chatback_sync::encoding::StorageEncoding;
use chatback_sync::{ChatbackSync, Database, VERSION};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    log::info!("chatback-sync v{}", VERSION);

    let config = Config::from_env();

    let encoding = StorageEncoding::from_label(&config.storage_encoding)
        .expect("CHATBACK_STORAGE_ENCODING must be a known encoding label");

    log::info!(
        "Initializing database at {} ({})",
        config.database_url,
        encoding.name()
    );
    let db = Database::new_with_encoding(&config.database_url, encoding)
        .expect("Failed to initialize database");
    let db = Arc::new(db);

    let sync = ChatbackSync::new_with_api_base(
        config.site_id,
        db.clone(),
        &config.account_api_key,
        &config.site_api_key,
        config.auto_sync_secs,
        config.api_base.as_deref(),
    )
    .expect("Failed to initialize sync client");

    // With an interval configured, respect the cron gate; otherwise run once
    let outcome = if config.auto_sync_secs > 0 {
        sync.maybe_auto_sync().await
    } else {
        sync.sync_comments().await.map(Some)
    };

    match outcome {
        Ok(Some(count)) => log::info!("Sync complete, {} new comments", count),
        Ok(None) => log::info!("Sync skipped, interval not elapsed"),
        Err(e) => log::warn!("Nothing synced: {}", e),
    }

    if let Ok(total) = db.comment_count() {
        log::info!("{} comments stored locally", total);
    }

    if let Some(channel) = &config.render_channel {
        println!("{}", sync.render_widget(channel));
    }
}
