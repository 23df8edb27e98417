use thiserror::Error;
use trendpulse_core::SourceKey;

/// Errors returned by a source fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-2xx response. `message` is the response text, or `HTTP {status}`
    /// when the body was empty.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not JSON, or its top-level shape does not match the
    /// entity the source feeds.
    #[error("malformed {source_key} payload: {reason}")]
    Malformed {
        source_key: SourceKey,
        reason: String,
    },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl FetchError {
    /// HTTP status of the failed response, when there was one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport(e) => e.status().map(|s| s.as_u16()),
            FetchError::Malformed { .. } | FetchError::InvalidBaseUrl { .. } => None,
        }
    }
}

/// A single record that could not be coerced into its canonical entity.
///
/// Never surfaced to callers: the normalizer logs it and skips the record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record {index}: {reason}")]
pub struct MalformedEntryError {
    pub index: usize,
    pub reason: String,
}
