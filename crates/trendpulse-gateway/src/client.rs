//! HTTP gateway for the demand backend.
//!
//! Wraps `reqwest` with one GET per logical source. Non-2xx responses become
//! [`FetchError::Status`] carrying the response text; bodies are validated and
//! normalized by [`crate::normalize`] before they leave this module.

use std::time::Duration;

use reqwest::{Client, Url};
use trendpulse_core::{AppConfig, SourceKey};

use crate::error::FetchError;
use crate::normalize::parse_payload;
use crate::payload::SourcePayload;
use crate::SourceGateway;

const HEALTH_PATH: &str = "/api/health";

/// Gateway backed by a shared `reqwest::Client`.
///
/// Use [`HttpGateway::from_config`] in the binary or
/// [`HttpGateway::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if the client cannot be built, or
    /// [`FetchError::InvalidBaseUrl`] if the configured base is not a URL.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::with_base_url(
            &config.api_base,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if the client cannot be built, or
    /// [`FetchError::InvalidBaseUrl`] if `base_url` is not a URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let base_url =
            Url::parse(base_url.trim_end_matches('/')).map_err(|e| FetchError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { client, base_url })
    }

    /// Fetches the raw JSON body for `key` without shape validation.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Status`] on a non-2xx response.
    /// - [`FetchError::Transport`] on network failure.
    /// - [`FetchError::Malformed`] if the body is not JSON.
    pub async fn fetch_raw(&self, key: SourceKey) -> Result<serde_json::Value, FetchError> {
        let url = self.build_url(key.path());
        let body = self.request_text(&url).await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Malformed {
            source_key: key,
            reason: format!("invalid JSON: {e}"),
        })
    }

    /// Calls the backend health endpoint and returns its JSON verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Status`] or [`FetchError::Transport`] when the
    /// request fails; a non-JSON body is returned as a JSON string.
    pub async fn health(&self) -> Result<serde_json::Value, FetchError> {
        let url = self.build_url(HEALTH_PATH);
        let body = self.request_text(&url).await?;
        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }

    /// Appends `path` to the base URL, keeping any path prefix the base
    /// already carries (e.g. a reverse-proxy mount point).
    fn build_url(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!("{}{path}", self.base_url.path().trim_end_matches('/'));
        url.set_path(&joined);
        url
    }

    /// Sends a GET and returns the body text of a 2xx response.
    async fn request_text(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                body
            };
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.text().await?)
    }
}

impl SourceGateway for HttpGateway {
    async fn fetch(&self, key: SourceKey) -> Result<SourcePayload, FetchError> {
        let raw = self.fetch_raw(key).await?;
        let payload = parse_payload(key, &raw)?;
        tracing::debug!(source = %key, empty = payload.is_empty(), "fetched source");
        Ok(payload)
    }
}
