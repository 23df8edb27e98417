use std::collections::HashMap;

use trendpulse_core::{HashtagAggregate, Signal, SocialPost};

use super::TOP_HASHTAG_LIMIT;

/// Sums signal velocity per lowercased keyword.
///
/// Signals without a keyword are skipped. The result is sorted by count,
/// descending; equal counts keep the order in which the keyword first
/// appeared. Callers truncate.
#[must_use]
pub fn aggregate_top_hashtags(signals: &[Signal]) -> Vec<HashtagAggregate> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut totals: Vec<HashtagAggregate> = Vec::new();

    for signal in signals {
        let hashtag = signal.keyword.to_lowercase();
        if hashtag.is_empty() {
            continue;
        }
        if let Some(&i) = index.get(&hashtag) {
            totals[i].count += signal.velocity;
        } else {
            index.insert(hashtag.clone(), totals.len());
            totals.push(HashtagAggregate {
                hashtag,
                count: signal.velocity,
            });
        }
    }

    // `sort_by` is stable, which keeps first-seen order among ties.
    totals.sort_by(|a, b| b.count.total_cmp(&a.count));
    totals
}

/// The hashtag list a view shows: the social feed's own ranking when it
/// ships one, otherwise the ranking derived from signals.
#[must_use]
pub fn top_hashtags_for_view(
    social_top: &[HashtagAggregate],
    signals: &[Signal],
) -> Vec<HashtagAggregate> {
    let mut top = if social_top.is_empty() {
        aggregate_top_hashtags(signals)
    } else {
        social_top.to_vec()
    };
    top.truncate(TOP_HASHTAG_LIMIT);
    top
}

/// A line of text to show under a hashtag.
///
/// Looks at the first social post tagged with `hashtag` (case-insensitive)
/// and uses its text if it has any; otherwise falls back to the text of the
/// first matching signal.
#[must_use]
pub fn snippet_for_hashtag(social: &[SocialPost], signals: &[Signal], hashtag: &str) -> String {
    if hashtag.is_empty() {
        return String::new();
    }
    let wanted = hashtag.to_lowercase();

    let post_text = social
        .iter()
        .find(|post| post.hashtag_or_empty().to_lowercase() == wanted)
        .map(|post| post.text.as_str())
        .filter(|text| !text.is_empty());
    if let Some(text) = post_text {
        return text.to_string();
    }

    signals
        .iter()
        .find(|signal| signal.keyword.to_lowercase() == wanted)
        .map(|signal| signal.text.clone())
        .unwrap_or_default()
}
