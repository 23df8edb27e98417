//! Source gateway for the demand backend.
//!
//! Issues one asynchronous GET per logical source and turns the loosely
//! shaped JSON it gets back into canonical entities. Malformed records are
//! skipped at this boundary so downstream code only sees well-typed data.

pub mod client;
pub mod error;
pub mod normalize;
pub mod payload;

use std::future::Future;

use trendpulse_core::SourceKey;

pub use client::HttpGateway;
pub use error::{FetchError, MalformedEntryError};
pub use payload::{SocialFeed, SourcePayload, TrendsSnapshot};

/// One fetch per logical source, no internal retry.
pub trait SourceGateway: Send + Sync {
    /// Fetches and normalizes the payload for `key`.
    fn fetch(
        &self,
        key: SourceKey,
    ) -> impl Future<Output = Result<SourcePayload, FetchError>> + Send;
}
