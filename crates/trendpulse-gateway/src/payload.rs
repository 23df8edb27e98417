//! Typed payloads produced by the gateway, one variant per source shape.

use trendpulse_core::{
    HashtagAggregate, Signal, SignalSource, SkuMapping, SocialPost, TrendKeyword,
};

/// The social feed: raw posts plus the backend's own hashtag ranking, which
/// may be empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SocialFeed {
    pub rows: Vec<SocialPost>,
    pub top_hashtags: Vec<HashtagAggregate>,
}

impl SocialFeed {
    /// A feed with no posts but a hashtag ranking is not empty: the ranking
    /// alone still feeds the live-trends cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.top_hashtags.is_empty()
    }
}

/// The aggregate `/api/trends` payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrendsSnapshot {
    pub signal_sources: Vec<SignalSource>,
    pub trend_keywords: Vec<TrendKeyword>,
}

impl TrendsSnapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signal_sources.is_empty() && self.trend_keywords.is_empty()
    }
}

/// A normalized, well-typed source payload.
#[derive(Debug, Clone, PartialEq)]
pub enum SourcePayload {
    Signals(Vec<Signal>),
    Social(SocialFeed),
    SkuMappings(Vec<SkuMapping>),
    Trends(TrendsSnapshot),
}

impl SourcePayload {
    /// A well-formed payload with nothing in it. The fallback resolver treats
    /// this like a missing result.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            SourcePayload::Signals(v) => v.is_empty(),
            SourcePayload::Social(feed) => feed.is_empty(),
            SourcePayload::SkuMappings(v) => v.is_empty(),
            SourcePayload::Trends(t) => t.is_empty(),
        }
    }

    #[must_use]
    pub fn as_signals(&self) -> Option<&[Signal]> {
        match self {
            SourcePayload::Signals(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_social(&self) -> Option<&SocialFeed> {
        match self {
            SourcePayload::Social(feed) => Some(feed),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sku_mappings(&self) -> Option<&[SkuMapping]> {
        match self {
            SourcePayload::SkuMappings(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_trends(&self) -> Option<&TrendsSnapshot> {
        match self {
            SourcePayload::Trends(t) => Some(t),
            _ => None,
        }
    }
}
