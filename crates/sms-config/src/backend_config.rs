use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_BACKEND_URL, DEFAULT_REQUEST_TIMEOUT_SECS,
    MAX_REQUEST_TIMEOUT_SECS, MIN_REQUEST_TIMEOUT_SECS,
};

use std::time::Duration;

use serde::Deserialize;

/// Connection settings for the hosted backend (auth + REST)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Project URL, e.g. "https://abcd.supabase.co"
    pub url: String,
    /// Public anon key sent as the `apikey` header
    pub anon_key: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::from(DEFAULT_BACKEND_URL),
            anon_key: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl BackendConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let url = self.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::backend(format!(
                "backend.url must start with http:// or https://, got '{}'",
                self.url
            )));
        }

        match self.anon_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {}
            _ => {
                return Err(ConfigError::backend(
                    "backend.anon_key is required (set SMS_BACKEND_ANON_KEY)",
                ));
            }
        }

        if !(MIN_REQUEST_TIMEOUT_SECS..=MAX_REQUEST_TIMEOUT_SECS)
            .contains(&self.request_timeout_secs)
        {
            return Err(ConfigError::backend(format!(
                "backend.request_timeout_secs must be {}-{}, got {}",
                MIN_REQUEST_TIMEOUT_SECS, MAX_REQUEST_TIMEOUT_SECS, self.request_timeout_secs
            )));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
