use crate::{BackendError, BackendResult};

use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder};
use serde_json::Value;

/// HTTP client for the backend's auth and REST endpoints
#[derive(Clone)]
pub struct BackendClient {
    pub base_url: String,
    api_key: String,
    http: ReqwestClient,
}

impl BackendClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Project URL (e.g., "https://abcd.supabase.co")
    /// * `api_key` - Public anon key, sent on every request
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> BackendResult<Self> {
        let http = ReqwestClient::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http,
        })
    }

    /// Build a request. Without a user token the anon key doubles as bearer.
    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        access_token: Option<&str>,
    ) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let bearer = access_token.unwrap_or(&self.api_key);

        self.http
            .request(method, &url)
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
    }

    /// Execute request and handle errors
    pub(crate) async fn execute(&self, req: RequestBuilder) -> BackendResult<Value> {
        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
            return Err(BackendError::from_error_body(status.as_u16(), &body));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&text)?)
    }
}
