use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A per-mention-burst observation from a trend source.
///
/// Produced by the gateway's normalizer, which has already folded the
/// upstream aliases: `keyword` is `keyword || hashtag`, `velocity` is
/// `velocity ?? mentions ?? value`, and `text` is `text || post`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Signal {
    pub id: String,
    pub sku: String,
    /// Platform label, e.g. `"TikTok"` or `"Google"`.
    pub source: String,
    /// Always `>= 0`.
    pub velocity: f64,
    /// Keyword or hashtag; may be empty.
    pub keyword: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub text: String,
}

/// A per-post observation from the social feed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SocialPost {
    pub post_id: String,
    pub source: String,
    pub sku: Option<String>,
    pub hashtag: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub text: String,
    /// Always `>= 0`.
    pub mentions: f64,
}

impl SocialPost {
    /// The hashtag, or `""` when absent.
    #[must_use]
    pub fn hashtag_or_empty(&self) -> &str {
        self.hashtag.as_deref().unwrap_or_default()
    }
}

/// A SKU with its externally computed risk/confidence score.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SkuMapping {
    pub sku: String,
    pub title: String,
    /// In `[0, 1]`. Never recomputed by the engine.
    pub score: f64,
}

/// A keyword pre-aggregated upstream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrendKeyword {
    pub keyword: String,
    pub mentions: f64,
    /// Signed percent change over 24 hours.
    pub change24: f64,
    /// Signed percent change over 7 days.
    pub change7: f64,
}

/// Mention volume for one platform, from the aggregate trends payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalSource {
    pub name: String,
    pub mentions: f64,
}

/// A hashtag with its summed mention volume.
///
/// Either shipped precomputed by the social feed or derived from signals.
/// `hashtag` is lowercased when derived.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HashtagAggregate {
    pub hashtag: String,
    pub count: f64,
}
