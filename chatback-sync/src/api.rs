//! HTTP client for the hosted comment service, plus the response decoder

use reqwest::{header, Client};
use std::time::Duration;

use crate::models::CommentListResponse;

const DEFAULT_API_BASE: &str = "https://chatback.me";
const COMMENT_LIST_PATH: &str = "/api/comment/list";

const USER_AGENT: &str = "Mozilla/4.0 (compatible; chatback comments sync)";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Legacy widget responses arrive wrapped by a jQuery JSONP callback
const JSONP_CALLBACK_OPEN: &str = "jQuery(";
const JSONP_CLOSE: &str = ");";

#[derive(Clone)]
pub struct ChatbackClient {
    client: Client,
    api_base: String,
    account_api_key: String,
    site_api_key: String,
}

impl ChatbackClient {
    pub fn new(account_api_key: &str, site_api_key: &str) -> Result<Self, String> {
        Self::new_with_api_base(account_api_key, site_api_key, None)
    }

    /// `api_base` overrides the vendor endpoint, for self-hosted gateways
    /// and for tests pointing at a mock server
    pub fn new_with_api_base(
        account_api_key: &str,
        site_api_key: &str,
        api_base: Option<&str>,
    ) -> Result<Self, String> {
        let api_base = api_base
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
            .to_string();

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            api_base,
            account_api_key: account_api_key.to_string(),
            site_api_key: site_api_key.to_string(),
        })
    }

    pub fn has_credentials(&self) -> bool {
        !self.account_api_key.is_empty() && !self.site_api_key.is_empty()
    }

    /// Fetch the raw comment-list body, filtered to ids above `since` when
    /// given. Redirects are followed; non-2xx responses are not treated as
    /// failures here - an error page simply fails to decode downstream.
    /// Only network-level errors (refused, DNS, timeout) return Err.
    pub async fn fetch_comment_list(&self, since: Option<i64>) -> Result<String, String> {
        let url = format!("{}{}", self.api_base, COMMENT_LIST_PATH);

        let mut query: Vec<(&str, String)> = vec![
            ("accountApiKey", self.account_api_key.clone()),
            ("siteApiKey", self.site_api_key.clone()),
        ];
        if let Some(id) = since {
            query.push(("id", id.to_string()));
        }

        log::debug!("[CHATBACK] GET {} (since: {:?})", url, since);

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| format!("Comment list request failed: {}", e))?;

        response
            .text()
            .await
            .map_err(|e| format!("Failed to read comment list body: {}", e))
    }
}

/// Strip the legacy JSONP envelope. Every occurrence of the callback-open
/// token and of the literal ");" is removed, not just the outermost pair,
/// so a message body containing ");" arrives corrupted. This matches the
/// legacy server responses; do not change it without confirming the
/// current wire shape.
fn strip_jsonp(raw: &str) -> String {
    if raw.contains(JSONP_CALLBACK_OPEN) {
        raw.replace(JSONP_CALLBACK_OPEN, "").replace(JSONP_CLOSE, "")
    } else {
        raw.to_string()
    }
}

/// Decode a comment-list body. Anything that is not the expected JSON
/// shape yields None, which the sync path treats as "no comments".
pub fn decode_comment_list(raw: &str) -> Option<CommentListResponse> {
    match serde_json::from_str(&strip_jsonp(raw)) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            log::debug!("[CHATBACK] undecodable comment list: {}", e);
            None
        }
    }
}
