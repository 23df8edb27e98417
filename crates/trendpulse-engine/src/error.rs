use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use trendpulse_core::SourceKey;
use trendpulse_gateway::FetchError;

/// A non-blocking warning rendered alongside fallback-derived content.
///
/// `EmptyResult` is the well-formed-but-empty case: it is not a failure, it
/// only explains why fallback data is on screen.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceNotice {
    #[error("{source_key} unavailable: {message}")]
    FetchFailed {
        source_key: SourceKey,
        status: Option<u16>,
        message: String,
    },

    #[error("{source_key} returned no data")]
    EmptyResult { source_key: SourceKey },
}

impl SourceNotice {
    #[must_use]
    pub fn fetch_failed(source_key: SourceKey, error: &Arc<FetchError>) -> Self {
        SourceNotice::FetchFailed {
            source_key,
            status: error.status(),
            message: error.to_string(),
        }
    }

    #[must_use]
    pub fn source_key(&self) -> SourceKey {
        match self {
            SourceNotice::FetchFailed { source_key, .. }
            | SourceNotice::EmptyResult { source_key } => *source_key,
        }
    }
}
