//! CLI - command-line argument parsing
//!
//! Defines the CLI structure using clap. All configuration is fixed at
//! startup; there is no hot reload.

use clap::Parser;
use std::time::Duration;

/// Digest-authenticated printer proxy and Prometheus exporter
#[derive(Parser, Debug)]
#[command(name = "printbridge")]
#[command(about = "Proxy and Prometheus exporter for a PrusaLink-class printer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The address to bind to
    #[arg(long, default_value = "0.0.0.0:8080")]
    pub bind: String,

    /// The base URL of the printer (e.g. http://192.168.1.50)
    #[arg(long)]
    pub address: String,

    /// The username for the printer
    #[arg(long, default_value = "maker")]
    pub username: String,

    /// The password for the printer
    #[arg(long, env = "PRUSA_LINK_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// The timeout in seconds for metrics requests to the printer
    #[arg(long, default_value_t = 15)]
    pub timeout_seconds: u64,
}

impl Cli {
    /// Per-fetch timeout applied to the metrics client only; the proxy path
    /// deliberately carries no timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
