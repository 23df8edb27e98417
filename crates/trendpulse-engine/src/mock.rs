//! Static fallback data, one set per source.

use chrono::{DateTime, TimeZone, Utc};
use trendpulse_core::{Signal, SignalSource, SkuMapping, SocialPost, TrendKeyword};
use trendpulse_gateway::{SocialFeed, TrendsSnapshot};

/// The mock set served for each source when live data is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct MockSets {
    pub signals: Vec<Signal>,
    pub google_signals: Vec<Signal>,
    pub social: SocialFeed,
    pub sku_mappings: Vec<SkuMapping>,
    pub trends: TrendsSnapshot,
}

impl Default for MockSets {
    fn default() -> Self {
        Self {
            signals: vec![
                mock_signal("1", "GS-019", "TikTok", 42.0, "#kettle", at(12, 0)),
                mock_signal("2", "GS-045", "Instagram", 18.0, "#mug", at(12, 1)),
            ],
            google_signals: vec![
                mock_signal("g-1", "GS-019", "Google", 12.0, "gooseneck kettle", at(12, 0)),
                mock_signal("g-2", "GS-045", "Google", 6.0, "stoneware mug", at(12, 5)),
            ],
            social: SocialFeed {
                rows: vec![
                    mock_post(
                        "p-1",
                        "TikTok",
                        "GS-019",
                        "#kettle",
                        120.0,
                        "Gooseneck kettle sold out again after the pour-over video",
                    ),
                    mock_post(
                        "p-2",
                        "Instagram",
                        "GS-045",
                        "#mug",
                        60.0,
                        "Stoneware mug restock request thread is growing",
                    ),
                    mock_post("p-3", "TikTok", "BL-101", "#blender", 30.0, ""),
                ],
                top_hashtags: Vec::new(),
            },
            sku_mappings: vec![
                SkuMapping {
                    sku: "GS-019".to_string(),
                    title: "Gooseneck Kettle".to_string(),
                    score: 0.92,
                },
                SkuMapping {
                    sku: "BL-101".to_string(),
                    title: "Compact Blender".to_string(),
                    score: 0.78,
                },
            ],
            trends: TrendsSnapshot {
                signal_sources: vec![
                    mock_source("TikTok", 45.0),
                    mock_source("Instagram", 28.0),
                    mock_source("Twitter/X", 15.0),
                    mock_source("Google", 12.0),
                ],
                trend_keywords: vec![
                    mock_keyword("#kettle", 1240.0, 18.5, 42.0),
                    mock_keyword("#mug", 860.0, 6.2, -3.1),
                    mock_keyword("#blender", 410.0, -2.4, 11.8),
                ],
            },
        }
    }
}

fn at(hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2026, 1, 8, hour, minute, 0).single()
}

fn mock_signal(
    id: &str,
    sku: &str,
    source: &str,
    velocity: f64,
    keyword: &str,
    timestamp: Option<DateTime<Utc>>,
) -> Signal {
    Signal {
        id: id.to_string(),
        sku: sku.to_string(),
        source: source.to_string(),
        velocity,
        keyword: keyword.to_string(),
        timestamp,
        text: String::new(),
    }
}

fn mock_post(
    post_id: &str,
    source: &str,
    sku: &str,
    hashtag: &str,
    mentions: f64,
    text: &str,
) -> SocialPost {
    SocialPost {
        post_id: post_id.to_string(),
        source: source.to_string(),
        sku: Some(sku.to_string()),
        hashtag: Some(hashtag.to_string()),
        date: at(9, 30),
        text: text.to_string(),
        mentions,
    }
}

fn mock_source(name: &str, mentions: f64) -> SignalSource {
    SignalSource {
        name: name.to_string(),
        mentions,
    }
}

fn mock_keyword(keyword: &str, mentions: f64, change24: f64, change7: f64) -> TrendKeyword {
    TrendKeyword {
        keyword: keyword.to_string(),
        mentions,
        change24,
        change7,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mock_set_is_populated() {
        let mocks = MockSets::default();
        assert!(!mocks.signals.is_empty());
        assert!(!mocks.google_signals.is_empty());
        assert!(!mocks.social.rows.is_empty());
        assert!(!mocks.sku_mappings.is_empty());
        assert!(!mocks.trends.is_empty());
    }

    #[test]
    fn mock_timestamps_are_set() {
        let mocks = MockSets::default();
        assert_eq!(
            mocks.signals[0].timestamp.map(|t| t.to_rfc3339()),
            Some("2026-01-08T12:00:00+00:00".to_string())
        );
    }

    #[test]
    fn mock_google_signals_are_google() {
        let mocks = MockSets::default();
        assert!(mocks
            .google_signals
            .iter()
            .all(|s| s.source.eq_ignore_ascii_case("google")));
    }
}
