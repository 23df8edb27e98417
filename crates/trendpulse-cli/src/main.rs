mod report;
mod watch;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use trendpulse_engine::{Dashboard, View};
use trendpulse_gateway::HttpGateway;

#[derive(Debug, Parser)]
#[command(name = "trendpulse")]
#[command(about = "Demand-signal dashboard engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch every source once and print the views as JSON
    Snapshot {
        #[arg(long, value_enum, default_value_t = ViewArg::All)]
        view: ViewArg,
    },
    /// Keep polling and print live trends whenever a source settles
    Watch {
        /// Stop after printing this many updates
        #[arg(long)]
        ticks: Option<u32>,
    },
    /// Print the snippet and matching posts for a hashtag
    Hashtag { tag: String },
    /// Print the backend health payload
    Health,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ViewArg {
    Overview,
    LiveTrends,
    All,
}

impl ViewArg {
    fn views(self) -> &'static [View] {
        match self {
            ViewArg::Overview => &[View::Overview],
            ViewArg::LiveTrends => &[View::LiveTrends],
            ViewArg::All => &[View::Overview, View::LiveTrends],
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = trendpulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries the JSON output.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let gateway = HttpGateway::from_config(&config)?;
    tracing::debug!(api_base = %config.api_base, "gateway ready");

    match cli.command {
        Commands::Snapshot { view } => {
            let dashboard = Dashboard::from_config(gateway, &config);
            report::run_snapshot(&dashboard, view.views()).await
        }
        Commands::Watch { ticks } => {
            let dashboard = Dashboard::from_config(gateway, &config);
            watch::run_watch(&dashboard, ticks).await
        }
        Commands::Hashtag { tag } => {
            let dashboard = Dashboard::from_config(gateway, &config);
            report::run_hashtag(&dashboard, &tag).await
        }
        Commands::Health => report::run_health(&gateway).await,
    }
}
