use trendpulse_core::{AlertStatus, DerivedAlert, ImpactLevel, SocialPost};

use super::ALERT_LIMIT;

const HIGH_MENTIONS: f64 = 100.0;
const MEDIUM_MENTIONS: f64 = 50.0;

fn classify(mentions: f64) -> (AlertStatus, ImpactLevel) {
    if mentions >= HIGH_MENTIONS {
        (AlertStatus::ActionRequired, ImpactLevel::High)
    } else if mentions >= MEDIUM_MENTIONS {
        (AlertStatus::InReview, ImpactLevel::Medium)
    } else {
        (AlertStatus::Approved, ImpactLevel::Low)
    }
}

fn alert_message(post: &SocialPost) -> String {
    if !post.text.is_empty() {
        return post.text.clone();
    }
    let tag = match post.hashtag_or_empty() {
        "" => "signal",
        tag => tag,
    };
    format!("{tag} on {}", post.source)
}

/// Alerts for the eight most-mentioned posts, loudest first.
#[must_use]
pub fn derived_alerts(posts: &[SocialPost]) -> Vec<DerivedAlert> {
    let mut ranked: Vec<&SocialPost> = posts.iter().collect();
    ranked.sort_by(|a, b| b.mentions.total_cmp(&a.mentions));

    ranked
        .into_iter()
        .take(ALERT_LIMIT)
        .enumerate()
        .map(|(rank, post)| {
            let (status, impact_level) = classify(post.mentions);
            DerivedAlert {
                id: if post.post_id.is_empty() {
                    format!("s-{rank}")
                } else {
                    post.post_id.clone()
                },
                message: alert_message(post),
                status,
                timestamp: post.date.map_or_else(
                    || "recent".to_string(),
                    |d| d.format("%Y-%m-%d %H:%M UTC").to_string(),
                ),
                impact_level,
            }
        })
        .collect()
}
