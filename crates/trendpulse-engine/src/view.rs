//! The two dashboard views and the hashtag drill-down.
//!
//! Report builders take resolved inputs and are pure; readiness and
//! resolution live in [`crate::Dashboard`].

use std::collections::BTreeMap;

use serde::Serialize;
use trendpulse_core::{
    DerivedAlert, HashtagCard, KpiSet, Signal, SkuMapping, SocialPost, SourceKey, SourceShare,
    TrendKeyword, TrendingRow, VelocityBuckets, VelocityPoint,
};
use trendpulse_gateway::{SocialFeed, TrendsSnapshot};

use crate::aggregate::{
    critical_sku_count, derived_alerts, kpi_rollup, rank_trend_keywords, snippet_for_hashtag,
    source_shares, source_velocity_buckets, top_hashtags_for_view, trending_rows, velocity_series,
};
use crate::error::SourceNotice;
use crate::fallback::{DataOrigin, Resolved};

/// Rows shown in the hashtag drill-down.
pub const HASHTAG_DETAIL_LIMIT: usize = 10;
/// Trend keywords listed on the live trends page.
pub const TREND_KEYWORD_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Overview,
    LiveTrends,
}

impl View {
    /// Sources the view reads.
    #[must_use]
    pub fn sources(self) -> &'static [SourceKey] {
        match self {
            View::Overview => &[SourceKey::SkuMappings, SourceKey::Social],
            View::LiveTrends => &[
                SourceKey::Signals,
                SourceKey::GoogleSignals,
                SourceKey::Social,
                SourceKey::Trends,
            ],
        }
    }
}

/// A view is loading while any source it reads is idle or pending,
/// including a refetch over data it already holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState<T> {
    Loading { pending: Vec<SourceKey> },
    Ready(T),
}

impl<T> ViewState<T> {
    #[must_use]
    pub fn ready(self) -> Option<T> {
        match self {
            ViewState::Ready(report) => Some(report),
            ViewState::Loading { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewReport {
    pub kpis: KpiSet,
    pub trending: Vec<TrendingRow>,
    pub critical_count: usize,
    pub alerts: Vec<DerivedAlert>,
    pub origins: BTreeMap<SourceKey, DataOrigin>,
    pub notices: Vec<SourceNotice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveTrendsReport {
    pub top_hashtags: Vec<HashtagCard>,
    pub velocity: VelocityBuckets,
    pub velocity_series: Vec<VelocityPoint>,
    pub trend_keywords: Vec<TrendKeyword>,
    pub source_shares: Vec<SourceShare>,
    pub origins: BTreeMap<SourceKey, DataOrigin>,
    pub notices: Vec<SourceNotice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashtagReport {
    pub hashtag: String,
    pub snippet: String,
    pub posts: Vec<SocialPost>,
}

#[derive(Default)]
struct Provenance {
    origins: BTreeMap<SourceKey, DataOrigin>,
    notices: Vec<SourceNotice>,
}

impl Provenance {
    fn record<T>(&mut self, key: SourceKey, resolved: &Resolved<T>) {
        self.origins.insert(key, resolved.origin);
        if let Some(notice) = &resolved.notice {
            self.notices.push(notice.clone());
        }
    }
}

#[must_use]
pub fn build_overview(
    sku_mappings: &Resolved<Vec<SkuMapping>>,
    social: &Resolved<SocialFeed>,
) -> OverviewReport {
    let mut provenance = Provenance::default();
    provenance.record(SourceKey::SkuMappings, sku_mappings);
    provenance.record(SourceKey::Social, social);

    let trending = trending_rows(&sku_mappings.data, &social.data.rows);
    OverviewReport {
        kpis: kpi_rollup(&sku_mappings.data, &social.data.rows),
        critical_count: critical_sku_count(&trending),
        trending,
        alerts: derived_alerts(&social.data.rows),
        origins: provenance.origins,
        notices: provenance.notices,
    }
}

#[must_use]
pub fn build_live_trends(
    signals: &Resolved<Vec<Signal>>,
    google_signals: &Resolved<Vec<Signal>>,
    social: &Resolved<SocialFeed>,
    trends: &Resolved<TrendsSnapshot>,
) -> LiveTrendsReport {
    let mut provenance = Provenance::default();
    provenance.record(SourceKey::Signals, signals);
    provenance.record(SourceKey::GoogleSignals, google_signals);
    provenance.record(SourceKey::Social, social);
    provenance.record(SourceKey::Trends, trends);

    let top_hashtags = top_hashtags_for_view(&social.data.top_hashtags, &signals.data)
        .into_iter()
        .map(|top| HashtagCard {
            snippet: snippet_for_hashtag(&social.data.rows, &signals.data, &top.hashtag),
            hashtag: top.hashtag,
            count: top.count,
        })
        .collect();

    LiveTrendsReport {
        top_hashtags,
        velocity: source_velocity_buckets(&signals.data, &google_signals.data),
        velocity_series: velocity_series(&signals.data),
        trend_keywords: rank_trend_keywords(&trends.data.trend_keywords, TREND_KEYWORD_LIMIT),
        source_shares: source_shares(&trends.data.signal_sources),
        origins: provenance.origins,
        notices: provenance.notices,
    }
}

/// Posts whose hashtag contains `selected`, ignoring case and the leading
/// `#`, capped at ten. An empty selection matches nothing.
#[must_use]
pub fn hashtag_detail(social: &[SocialPost], selected: &str) -> Vec<SocialPost> {
    if selected.is_empty() {
        return Vec::new();
    }
    let needle = selected.to_lowercase().replacen('#', "", 1);
    social
        .iter()
        .filter(|post| {
            let tag = post.hashtag_or_empty().to_lowercase();
            !tag.is_empty() && tag.contains(&needle)
        })
        .take(HASHTAG_DETAIL_LIMIT)
        .cloned()
        .collect()
}
