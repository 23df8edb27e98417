//! Shapes computed by the aggregation engine and read by the views.
//!
//! Field names serialize in camelCase to match the dashboard's JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse stockout estimate bucketed from a SKU's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockoutWindow {
    #[serde(rename = "18 hours")]
    Hours,
    #[serde(rename = "3 days")]
    Days,
}

impl StockoutWindow {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            StockoutWindow::Hours => "18 hours",
            StockoutWindow::Days => "3 days",
        }
    }

    /// Windows measured in hours count as critical.
    #[must_use]
    pub fn is_critical(self) -> bool {
        matches!(self, StockoutWindow::Hours)
    }
}

impl fmt::Display for StockoutWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the trending-SKU table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingRow {
    pub id: String,
    pub name: String,
    pub sku: String,
    /// Mentions relative to a 50-mention baseline, as a percentage. At most 999.
    pub trend_spike: u32,
    pub time_until_stockout: StockoutWindow,
    pub revenue_at_risk: i64,
    /// `round(score * 100)`, so always within `0..=100`.
    pub confidence: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Approved,
    InReview,
    ActionRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

/// An alert synthesized from a high-volume social post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedAlert {
    pub id: String,
    pub message: String,
    pub status: AlertStatus,
    /// Display string: `YYYY-MM-DD HH:MM UTC`, or `recent` when undated.
    pub timestamp: String,
    pub impact_level: ImpactLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSet {
    pub skus_monitored: usize,
    pub active_alerts: usize,
    pub revenue_protected: i64,
    pub revenue_at_risk: i64,
}

/// Velocity summed per platform.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VelocityBuckets {
    pub google: f64,
    pub tiktok: f64,
    pub instagram: f64,
}

/// One bar of the signal velocity chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VelocityPoint {
    pub name: String,
    pub velocity: f64,
}

/// A platform's share of total mention volume.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceShare {
    pub name: String,
    pub mentions: f64,
    /// Whole percent of the total.
    pub share: u32,
}

/// A top hashtag with the snippet shown under it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HashtagCard {
    pub hashtag: String,
    pub count: f64,
    pub snippet: String,
}
