//! ranking-server binary: Pi node ranking server

use std::path::PathBuf;

use clap::Parser;
use ranking_core::RankingConfig;
use ranking_server::metrics::init_prometheus_recorder;
use ranking_server::ServerBuilder;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ranking-server")]
#[command(about = "Serve the Pi node ranking as HTML and JSON")]
struct Args {
    /// JSON config file (overrides --data-dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base directory holding data/nodes_ranking.json and friends
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Port to listen on
    #[arg(long, default_value = "3000")]
    port: u16,

    /// Disable the Prometheus endpoint
    #[arg(long)]
    no_metrics: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("ranking_server=info".parse()?)
                .add_directive("ranking_core=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RankingConfig::load(path)?,
        None => RankingConfig::from_base_dir(&args.data_dir),
    };
    tracing::info!(candidates = config.data_candidates.len(), "Configuration loaded");

    let mut builder = ServerBuilder::new(config).port(args.port);
    if !args.no_metrics {
        builder = builder.metrics(init_prometheus_recorder()?);
    }

    let server = builder.build().await;

    tracing::info!("Server ready on port {}", args.port);
    server.run().await?;

    Ok(())
}
