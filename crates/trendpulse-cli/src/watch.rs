use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use trendpulse_engine::{Dashboard, FetchOutcome, View};
use trendpulse_gateway::SourceGateway;

use crate::report::prime_view;

/// How often the loop checks for due sources. Refetch intervals are
/// enforced by the cache, not by this tick.
const POLL_TICK: Duration = Duration::from_secs(1);

fn print_live_trends<G: SourceGateway>(dashboard: &Dashboard<G>) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(&dashboard.live_trends())?);
    Ok(())
}

/// Poll the live-trends sources until Ctrl-C, or until `ticks` updates have
/// been printed.
///
/// Prints one compact JSON line on start and another each time a refetch
/// lands.
///
/// # Errors
///
/// Returns an error if a report cannot be serialized.
pub(crate) async fn run_watch<G: SourceGateway>(
    dashboard: &Dashboard<G>,
    ticks: Option<u32>,
) -> anyhow::Result<()> {
    prime_view(dashboard, View::LiveTrends).await;
    print_live_trends(dashboard)?;

    let mut printed = 0u32;
    let mut interval = tokio::time::interval(POLL_TICK);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while ticks.is_none_or(|limit| printed < limit) {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, stopping watch");
                break;
            }
            _ = interval.tick() => {
                let outcomes = dashboard.cache().poll_due(Instant::now()).await;
                let landed = outcomes
                    .iter()
                    .filter(|(_, outcome)| matches!(outcome, FetchOutcome::Applied(_)))
                    .count();
                if landed > 0 {
                    tracing::debug!(landed, "sources refreshed");
                    print_live_trends(dashboard)?;
                    printed += 1;
                }
            }
        }
    }

    dashboard.teardown();
    Ok(())
}
