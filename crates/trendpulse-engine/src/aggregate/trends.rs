use trendpulse_core::{SignalSource, SourceShare, TrendKeyword};

/// Trend keywords by mention volume, descending (stable), cut to `limit`.
#[must_use]
pub fn rank_trend_keywords(keywords: &[TrendKeyword], limit: usize) -> Vec<TrendKeyword> {
    let mut ranked = keywords.to_vec();
    ranked.sort_by(|a, b| b.mentions.total_cmp(&a.mentions));
    ranked.truncate(limit);
    ranked
}

/// Each platform's share of total mentions, in whole percent. Shares are
/// rounded independently, so they need not sum to exactly 100.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn source_shares(sources: &[SignalSource]) -> Vec<SourceShare> {
    let total: f64 = sources.iter().map(|s| s.mentions).sum();
    sources
        .iter()
        .map(|source| SourceShare {
            name: source.name.clone(),
            mentions: source.mentions,
            share: if total > 0.0 {
                (source.mentions / total * 100.0).round() as u32
            } else {
                0
            },
        })
        .collect()
}
