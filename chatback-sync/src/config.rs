use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub site_id: i64,
    pub account_api_key: String,
    pub site_api_key: String,
    pub auto_sync_secs: i64,
    pub storage_encoding: String,
    pub api_base: Option<String>,
    pub render_channel: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("CHATBACK_DATABASE_URL")
                .unwrap_or_else(|_| "./data/chatback.db".to_string()),
            site_id: env::var("CHATBACK_SITE_ID")
                .expect("CHATBACK_SITE_ID must be set")
                .parse()
                .expect("CHATBACK_SITE_ID must be a valid integer"),
            account_api_key: env::var("CHATBACK_ACCOUNT_API_KEY")
                .expect("CHATBACK_ACCOUNT_API_KEY must be set"),
            site_api_key: env::var("CHATBACK_SITE_API_KEY")
                .expect("CHATBACK_SITE_API_KEY must be set"),
            auto_sync_secs: env::var("CHATBACK_AUTO_SYNC_SECS")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .expect("CHATBACK_AUTO_SYNC_SECS must be a valid number of seconds"),
            storage_encoding: env::var("CHATBACK_STORAGE_ENCODING")
                .unwrap_or_else(|_| "utf-8".to_string()),
            api_base: env::var("CHATBACK_API_BASE").ok(),
            render_channel: env::var("CHATBACK_RENDER_CHANNEL").ok(),
        }
    }
}
