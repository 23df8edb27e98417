//! Picks the data set a view computes over: live, filtered live, or mock.
//!
//! Precedence per source, highest first:
//!
//! 1. the last successful live payload, if non-empty;
//! 2. for derivable sources, a filtered subset of a broader live payload
//!    (Google signals picked out of the combined signal list), if non-empty;
//! 3. the source's static mock set.
//!
//! Resolution is a pure function of its inputs and never mutates live data.

use serde::Serialize;
use trendpulse_core::{Signal, SkuMapping, SourceKey};
use trendpulse_gateway::{SocialFeed, SourcePayload, TrendsSnapshot};

use crate::cache::{FetchStatus, SourceSnapshot};
use crate::error::SourceNotice;

/// A data set that can stand in for a source's payload.
pub trait FallbackData: Clone {
    fn is_empty(&self) -> bool;

    /// Extracts this shape from a payload, or `None` when the payload is a
    /// different variant.
    fn from_payload(payload: &SourcePayload) -> Option<Self>;
}

impl FallbackData for Vec<Signal> {
    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    fn from_payload(payload: &SourcePayload) -> Option<Self> {
        payload.as_signals().map(<[Signal]>::to_vec)
    }
}

impl FallbackData for Vec<SkuMapping> {
    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    fn from_payload(payload: &SourcePayload) -> Option<Self> {
        payload.as_sku_mappings().map(<[SkuMapping]>::to_vec)
    }
}

impl FallbackData for SocialFeed {
    fn is_empty(&self) -> bool {
        SocialFeed::is_empty(self)
    }

    fn from_payload(payload: &SourcePayload) -> Option<Self> {
        payload.as_social().cloned()
    }
}

impl FallbackData for TrendsSnapshot {
    fn is_empty(&self) -> bool {
        TrendsSnapshot::is_empty(self)
    }

    fn from_payload(payload: &SourcePayload) -> Option<Self> {
        payload.as_trends().cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Live,
    FilteredLive,
    Mock,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub data: T,
    pub origin: DataOrigin,
    /// Set when the source errored, or when fallback data is shown because
    /// the live payload was empty.
    pub notice: Option<SourceNotice>,
}

/// Applies the precedence order to already-extracted inputs.
///
/// Returns the mock set only when neither `live` nor `filtered` has
/// anything in it.
#[must_use]
pub fn resolve<T: FallbackData>(
    live: Option<&T>,
    filtered: Option<T>,
    mock: &T,
) -> (T, DataOrigin) {
    if let Some(live) = live.filter(|l| !l.is_empty()) {
        return (live.clone(), DataOrigin::Live);
    }
    if let Some(filtered) = filtered.filter(|f| !f.is_empty()) {
        return (filtered, DataOrigin::FilteredLive);
    }
    (mock.clone(), DataOrigin::Mock)
}

/// Resolves one source from its cache snapshot and attaches the notice a
/// view should show next to the data.
#[must_use]
pub fn resolve_source<T: FallbackData>(
    key: SourceKey,
    snapshot: &SourceSnapshot,
    filtered: Option<T>,
    mock: &T,
) -> Resolved<T> {
    let live = snapshot.data.as_deref().and_then(T::from_payload);
    let (data, origin) = resolve(live.as_ref(), filtered, mock);

    let notice = match (&snapshot.error, snapshot.status) {
        (Some(err), FetchStatus::Error) => Some(SourceNotice::fetch_failed(key, err)),
        _ if origin != DataOrigin::Live && snapshot.settled => {
            Some(SourceNotice::EmptyResult { source_key: key })
        }
        _ => None,
    };
    if origin != DataOrigin::Live {
        tracing::debug!(source = %key, ?origin, "serving fallback data");
    }

    Resolved {
        data,
        origin,
        notice,
    }
}

/// Signals whose platform label mentions Google, case-insensitively.
#[must_use]
pub fn google_subset(signals: &[Signal]) -> Vec<Signal> {
    signals
        .iter()
        .filter(|s| s.source.to_lowercase().contains("google"))
        .cloned()
        .collect()
}
