//! printbridge daemon - digest-authenticated printer proxy and Prometheus
//! exporter.

use anyhow::Result;
use clap::Parser;
use printbridge::cli::Cli;
use printbridge::client::PrinterClient;
use printbridge::collector::SnapshotCollector;
use printbridge::server::{self, AppState};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("printbridge v{} starting", env!("CARGO_PKG_VERSION"));
    info!("Printer address: {}", cli.address);

    // The metrics client carries the per-fetch timeout; the proxy client has
    // none so long-running printer calls pass through untouched.
    let metrics_client = PrinterClient::new(
        &cli.address,
        &cli.username,
        &cli.password,
        Some(cli.fetch_timeout()),
    )?;
    let proxy_client = PrinterClient::new(&cli.address, &cli.username, &cli.password, None)?;

    let state = AppState {
        collector: SnapshotCollector::new(metrics_client),
        proxy_client,
    };

    server::run(&cli.bind, state).await
}
