use std::collections::HashMap;

use trendpulse_core::{KpiSet, SkuMapping, SocialPost, StockoutWindow, TrendingRow};

use super::TRENDING_ROW_LIMIT;

/// Mentions that count as a 100% spike.
const SPIKE_BASELINE: f64 = 50.0;
const MAX_TREND_SPIKE: f64 = 999.0;
/// Scores below this are expected to stock out within hours.
const CRITICAL_SCORE: f64 = 0.85;
const ROW_REVENUE_SCALE: f64 = 120_000.0;
const PROTECTED_REVENUE_SCALE: f64 = 100_000.0;
const AT_RISK_REVENUE_SCALE: f64 = 50_000.0;
/// Posts at or above this mention count are active alerts.
const ALERT_MENTIONS: f64 = 50.0;

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Total mentions per SKU. Posts without a SKU are keyed by their hashtag,
/// then by `"unknown"`.
fn mentions_by_sku(posts: &[SocialPost]) -> HashMap<&str, f64> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for post in posts {
        let key = non_empty(post.sku.as_deref())
            .or_else(|| non_empty(post.hashtag.as_deref()))
            .unwrap_or("unknown");
        *totals.entry(key).or_default() += post.mentions;
    }
    totals
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn trending_row(index: usize, mapping: &SkuMapping, mentions: f64) -> TrendingRow {
    // The gateway rejects out-of-range scores; mappings built elsewhere are
    // not checked.
    let score = mapping.score.clamp(0.0, 1.0);
    let trend_spike = (mentions / SPIKE_BASELINE * 100.0)
        .round()
        .min(MAX_TREND_SPIKE) as u32;
    let time_until_stockout = if score < CRITICAL_SCORE {
        StockoutWindow::Hours
    } else {
        StockoutWindow::Days
    };

    TrendingRow {
        id: if mapping.sku.is_empty() {
            format!("sku-{index}")
        } else {
            mapping.sku.clone()
        },
        name: if mapping.title.is_empty() {
            mapping.sku.clone()
        } else {
            mapping.title.clone()
        },
        sku: if mapping.sku.is_empty() {
            mapping.title.clone()
        } else {
            mapping.sku.clone()
        },
        trend_spike,
        time_until_stockout,
        revenue_at_risk: ((1.0 - score) * ROW_REVENUE_SCALE).round() as i64,
        confidence: (score * 100.0).round() as u8,
    }
}

/// One row per SKU mapping, enriched with social mention volume, ranked by
/// trend spike (stable, descending) and cut to the top ten.
#[must_use]
pub fn trending_rows(sku_mappings: &[SkuMapping], posts: &[SocialPost]) -> Vec<TrendingRow> {
    let mentions = mentions_by_sku(posts);
    let mut rows: Vec<TrendingRow> = sku_mappings
        .iter()
        .enumerate()
        .map(|(i, mapping)| {
            let m = mentions.get(mapping.sku.as_str()).copied().unwrap_or(0.0);
            trending_row(i, mapping, m)
        })
        .collect();
    rows.sort_by(|a, b| b.trend_spike.cmp(&a.trend_spike));
    rows.truncate(TRENDING_ROW_LIMIT);
    rows
}

/// Headline numbers for the overview page.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn kpi_rollup(sku_mappings: &[SkuMapping], posts: &[SocialPost]) -> KpiSet {
    let protected: f64 = sku_mappings
        .iter()
        .map(|m| m.score * PROTECTED_REVENUE_SCALE)
        .sum();
    let at_risk: f64 = sku_mappings
        .iter()
        .map(|m| (1.0 - m.score) * AT_RISK_REVENUE_SCALE)
        .sum();

    KpiSet {
        skus_monitored: sku_mappings.len(),
        active_alerts: posts.iter().filter(|p| p.mentions >= ALERT_MENTIONS).count(),
        revenue_protected: protected.round() as i64,
        revenue_at_risk: at_risk.round() as i64,
    }
}

/// Rows whose stockout window is measured in hours.
#[must_use]
pub fn critical_sku_count(rows: &[TrendingRow]) -> usize {
    rows.iter()
        .filter(|row| row.time_until_stockout.is_critical())
        .count()
}
