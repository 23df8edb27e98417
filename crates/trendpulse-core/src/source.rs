use serde::{Deserialize, Serialize};

/// One upstream data feed polled by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKey {
    /// Combined trend signals from every platform.
    Signals,
    /// Google-only trend signals from the dedicated endpoint.
    GoogleSignals,
    /// Social posts plus an optional upstream hashtag ranking.
    Social,
    /// Externally scored SKU mappings.
    SkuMappings,
    /// Aggregate trends: signal-source mix and trend keywords.
    Trends,
}

impl SourceKey {
    pub const ALL: [SourceKey; 5] = [
        SourceKey::Signals,
        SourceKey::GoogleSignals,
        SourceKey::Social,
        SourceKey::SkuMappings,
        SourceKey::Trends,
    ];

    /// Path suffix appended to the configured base URL.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            SourceKey::Signals => "/api/trends/signals",
            SourceKey::GoogleSignals => "/api/trends/signals/google",
            SourceKey::Social => "/api/social",
            SourceKey::SkuMappings => "/api/sku-mappings",
            SourceKey::Trends => "/api/trends",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKey::Signals => "signals",
            SourceKey::GoogleSignals => "google_signals",
            SourceKey::Social => "social",
            SourceKey::SkuMappings => "sku_mappings",
            SourceKey::Trends => "trends",
        }
    }

    /// Live trend and social feeds are re-polled on a fixed interval;
    /// SKU mappings only refresh on demand.
    #[must_use]
    pub fn is_live(self) -> bool {
        !matches!(self, SourceKey::SkuMappings)
    }
}

impl std::fmt::Display for SourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
