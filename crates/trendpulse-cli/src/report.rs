use serde_json::{Map, Value};
use trendpulse_engine::{Dashboard, View};
use trendpulse_gateway::{HttpGateway, SourceGateway};

/// Primes `view` and logs what each source fetch did.
pub(crate) async fn prime_view<G: SourceGateway>(dashboard: &Dashboard<G>, view: View) {
    for (source, outcome) in dashboard.prime(view).await {
        tracing::info!(%source, ?outcome, "source fetched");
    }
}

/// Fetch the sources behind `views` once and print each report.
///
/// Sources shared between views are fetched once; the second view finds
/// them fresh.
///
/// # Errors
///
/// Returns an error if a report cannot be serialized. Source failures are
/// not errors: they show up as notices next to fallback data.
pub(crate) async fn run_snapshot<G: SourceGateway>(
    dashboard: &Dashboard<G>,
    views: &[View],
) -> anyhow::Result<()> {
    let mut out = Map::new();
    for view in views {
        prime_view(dashboard, *view).await;
        let (name, report) = match view {
            View::Overview => ("overview", serde_json::to_value(dashboard.overview())?),
            View::LiveTrends => ("live_trends", serde_json::to_value(dashboard.live_trends())?),
        };
        out.insert(name.to_string(), report);
    }
    dashboard.teardown();

    println!("{}", serde_json::to_string_pretty(&Value::Object(out))?);
    Ok(())
}

/// Print the snippet and up to ten posts tagged with `tag`.
///
/// # Errors
///
/// Returns an error if the report cannot be serialized.
pub(crate) async fn run_hashtag<G: SourceGateway>(
    dashboard: &Dashboard<G>,
    tag: &str,
) -> anyhow::Result<()> {
    prime_view(dashboard, View::LiveTrends).await;
    let report = dashboard.hashtag(tag);
    dashboard.teardown();

    if report.posts.is_empty() {
        tracing::info!(%tag, "no posts match hashtag");
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Print whatever the backend's health endpoint returns.
///
/// # Errors
///
/// Returns an error if the backend is unreachable or answers non-2xx.
pub(crate) async fn run_health(gateway: &HttpGateway) -> anyhow::Result<()> {
    let health = gateway.health().await?;
    println!("{}", serde_json::to_string_pretty(&health)?);
    Ok(())
}
