use tokio::time::Instant;
use trendpulse_core::{AppConfig, Signal, SkuMapping, SourceKey};
use trendpulse_gateway::{SocialFeed, SourceGateway, TrendsSnapshot};

use crate::aggregate::snippet_for_hashtag;
use crate::cache::{FetchOutcome, PollingCache};
use crate::fallback::{google_subset, resolve_source, FallbackData, Resolved};
use crate::mock::MockSets;
use crate::view::{
    build_live_trends, build_overview, hashtag_detail, HashtagReport, LiveTrendsReport,
    OverviewReport, View, ViewState,
};

/// Binds the polling cache, the mock sets, and the report builders.
pub struct Dashboard<G> {
    cache: PollingCache<G>,
    mocks: MockSets,
}

impl<G: SourceGateway> Dashboard<G> {
    #[must_use]
    pub fn new(cache: PollingCache<G>, mocks: MockSets) -> Self {
        Self { cache, mocks }
    }

    #[must_use]
    pub fn from_config(gateway: G, config: &AppConfig) -> Self {
        Self::new(
            PollingCache::from_config(gateway, config),
            MockSets::default(),
        )
    }

    pub fn cache(&self) -> &PollingCache<G> {
        &self.cache
    }

    /// Starts observing every source `view` reads.
    pub fn observe(&self, view: View) {
        self.cache.observe(view.sources());
    }

    /// Observes `view` and fetches whichever of its sources are idle,
    /// errored, or stale, concurrently.
    pub async fn prime(&self, view: View) -> Vec<(SourceKey, FetchOutcome)> {
        self.observe(view);
        self.cache
            .ensure_fresh_all(view.sources(), Instant::now())
            .await
    }

    /// Drops every slot; in-flight fetches are ignored when they land.
    pub fn teardown(&self) {
        self.cache.teardown();
    }

    #[must_use]
    pub fn overview(&self) -> ViewState<OverviewReport> {
        if let Some(loading) = self.loading(View::Overview) {
            return loading;
        }
        let sku_mappings: Resolved<Vec<SkuMapping>> =
            self.resolve(SourceKey::SkuMappings, None, &self.mocks.sku_mappings);
        let social = self.social();
        ViewState::Ready(build_overview(&sku_mappings, &social))
    }

    #[must_use]
    pub fn live_trends(&self) -> ViewState<LiveTrendsReport> {
        if let Some(loading) = self.loading(View::LiveTrends) {
            return loading;
        }
        let signals: Resolved<Vec<Signal>> =
            self.resolve(SourceKey::Signals, None, &self.mocks.signals);
        let google_signals = self.google_signals();
        let social = self.social();
        let trends: Resolved<TrendsSnapshot> =
            self.resolve(SourceKey::Trends, None, &self.mocks.trends);
        ViewState::Ready(build_live_trends(
            &signals,
            &google_signals,
            &social,
            &trends,
        ))
    }

    /// Snippet and matching posts for `tag`, computed from already-resolved
    /// social and signal data without touching the network.
    #[must_use]
    pub fn hashtag(&self, tag: &str) -> HashtagReport {
        let social = self.social();
        let signals: Resolved<Vec<Signal>> =
            self.resolve(SourceKey::Signals, None, &self.mocks.signals);
        HashtagReport {
            hashtag: tag.to_string(),
            snippet: snippet_for_hashtag(&social.data.rows, &signals.data, tag),
            posts: hashtag_detail(&social.data.rows, tag),
        }
    }

    fn loading<T>(&self, view: View) -> Option<ViewState<T>> {
        let pending = self.cache.not_terminal(view.sources());
        if pending.is_empty() {
            None
        } else {
            Some(ViewState::Loading { pending })
        }
    }

    fn resolve<T: FallbackData>(
        &self,
        key: SourceKey,
        filtered: Option<T>,
        mock: &T,
    ) -> Resolved<T> {
        resolve_source(key, &self.cache.snapshot(key), filtered, mock)
    }

    fn social(&self) -> Resolved<SocialFeed> {
        self.resolve(SourceKey::Social, None, &self.mocks.social)
    }

    /// The dedicated Google feed, else Google signals picked out of the
    /// combined live feed, else the mock set.
    fn google_signals(&self) -> Resolved<Vec<Signal>> {
        let filtered = self
            .cache
            .snapshot(SourceKey::Signals)
            .data
            .as_deref()
            .and_then(|payload| payload.as_signals().map(google_subset));
        self.resolve(
            SourceKey::GoogleSignals,
            filtered,
            &self.mocks.google_signals,
        )
    }
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
