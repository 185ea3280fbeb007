// src/explorer.rs
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Result, ScanError};
use crate::models::QueryParams;

/// Envelope returned by every explorer API call
#[derive(Debug, Deserialize, Clone)]
pub struct ApiResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: Value,
}

impl ApiResponse {
    /// `status == "0"`: nothing (more) for this window, or an API-level refusal
    pub fn is_empty(&self) -> bool {
        self.status == "0"
    }
}

/// HTTP session against the explorer's `/api` endpoint
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    http: Client,
    base_url: String,
    max_attempts: u32,
    retry_backoff: Duration,
}

impl ExplorerClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = Client::builder().timeout(cfg.request_timeout).build()?;

        Ok(Self {
            http,
            base_url: cfg.api_url.clone(),
            max_attempts: cfg.max_attempts.max(1),
            retry_backoff: cfg.retry_backoff,
        })
    }

    /// GET one page of logs, retrying transport failures and 429/5xx
    pub async fn query(&self, params: &QueryParams) -> Result<ApiResponse> {
        let mut attempt = 1;
        let mut delay = self.retry_backoff;

        loop {
            match self.send(params).await {
                Ok(text) => return parse_body(&text),
                // the URL carries the api key, keep it out of logs and errors
                Err(e) if attempt < self.max_attempts && is_retryable(&e) => {
                    warn!(
                        "Explorer request failed (attempt {}/{}, blocks {}-{} page {}): {}. Retrying in {:?}",
                        attempt,
                        self.max_attempts,
                        params.from_block,
                        params.to_block,
                        params.page,
                        e.without_url(),
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                    attempt += 1;
                }
                Err(e) => return Err(ScanError::Transport(e.without_url())),
            }
        }
    }

    async fn send(&self, params: &QueryParams) -> std::result::Result<String, reqwest::Error> {
        debug!(
            "GET {} (blocks {}-{}, page {}, offset {})",
            self.base_url, params.from_block, params.to_block, params.page, params.offset
        );

        let resp = self.http.get(&self.base_url).query(params).send().await?;
        resp.error_for_status()?.text().await
    }
}

fn is_retryable(e: &reqwest::Error) -> bool {
    match e.status() {
        Some(status) => status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error(),
        None => true,
    }
}

fn parse_body(text: &str) -> Result<ApiResponse> {
    serde_json::from_str(text).map_err(|e| {
        let preview: String = text.chars().take(120).collect();
        ScanError::Parse(format!("{e} (body starts with {preview:?})"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_log_page() {
        let body = json!({"status": "1", "message": "OK", "result": []}).to_string();
        let resp = parse_body(&body).unwrap();
        assert!(!resp.is_empty());
        assert_eq!(resp.result, json!([]));
    }

    #[test]
    fn status_zero_means_nothing_more() {
        let body = r#"{"status":"0","message":"No records found","result":[]}"#;
        let resp = parse_body(body).unwrap();
        assert!(resp.is_empty());
        assert_eq!(resp.message, "No records found");
    }

    #[test]
    fn non_json_body_is_parse_error() {
        let err = parse_body("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ScanError::Parse(msg) if msg.contains("502 Bad Gateway")));
    }

    #[test]
    fn missing_status_is_parse_error() {
        assert!(matches!(parse_body(r#"{"result": []}"#), Err(ScanError::Parse(_))));
    }
}
