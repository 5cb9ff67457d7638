use anyhow::{Context, Result};
use serde_json::Value;

use crate::http_client::http_client;

/// Thin JSON client for the external API. Non-2xx responses become errors
/// carrying the HTTP status; bodies are JSON in both directions.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        let endpoint = endpoint.trim_start_matches('/');
        if endpoint.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{endpoint}", self.base_url)
        }
    }

    pub fn get(&self, endpoint: &str) -> Result<Value> {
        let url = self.endpoint_url(endpoint);
        let resp = http_client()?
            .get(&url)
            .send()
            .with_context(|| format!("API request failed: {url}"))?;
        Self::json_body(resp, &url)
    }

    pub fn post(&self, endpoint: &str, body: &Value) -> Result<Value> {
        let url = self.endpoint_url(endpoint);
        let resp = http_client()?
            .post(&url)
            .json(body)
            .send()
            .with_context(|| format!("API request failed: {url}"))?;
        Self::json_body(resp, &url)
    }

    fn json_body(resp: reqwest::blocking::Response, url: &str) -> Result<Value> {
        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("API request failed: HTTP {status} from {url}"));
        }
        resp.json()
            .with_context(|| format!("invalid API response body from {url}"))
    }
}
