use trendpulse_core::{Signal, VelocityBuckets, VelocityPoint};

/// Sums velocity per platform.
///
/// A signal lands in the first bucket whose name appears in its `source`
/// (case-insensitive), checked google, then tiktok, then instagram; other
/// platforms are dropped. When the dedicated Google feed has data, its total
/// replaces the google bucket.
#[must_use]
pub fn source_velocity_buckets(signals: &[Signal], google_signals: &[Signal]) -> VelocityBuckets {
    let mut buckets = VelocityBuckets::default();
    for signal in signals {
        let source = signal.source.to_lowercase();
        if source.contains("google") {
            buckets.google += signal.velocity;
        } else if source.contains("tiktok") {
            buckets.tiktok += signal.velocity;
        } else if source.contains("instagram") {
            buckets.instagram += signal.velocity;
        }
    }
    if !google_signals.is_empty() {
        buckets.google = google_signals.iter().map(|s| s.velocity).sum();
    }
    buckets
}

/// One chart point per signal, labelled by keyword, then platform.
#[must_use]
pub fn velocity_series(signals: &[Signal]) -> Vec<VelocityPoint> {
    signals
        .iter()
        .map(|signal| {
            let name = [signal.keyword.as_str(), signal.source.as_str()]
                .into_iter()
                .find(|s| !s.is_empty())
                .unwrap_or("signal");
            VelocityPoint {
                name: name.to_string(),
                velocity: signal.velocity,
            }
        })
        .collect()
}
