//! TrackFinder Web Server Binary
//!
//! This binary starts the TrackFinder web server that provides a REST API
//! for the storefront and admin frontends.
//!
//! # Usage
//!
//! ```bash
//! # Start with the configured host, port and data directory
//! trackfinder-web
//!
//! # Specify port and data directory
//! trackfinder-web --port 8080 --data-dir ./catalog
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trackfinder::catalog::resolve_data_dir;
use trackfinder::config::Config;
use trackfinder::web;

/// TrackFinder Web Server - REST API for the catalog
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (defaults to server.port from the config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (defaults to server.host from the config)
    #[arg(long)]
    host: Option<String>,

    /// Directory containing the catalog JSON files.
    /// Defaults to catalog.data_dir from the config.
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;

    let data_dir = resolve_data_dir(args.data_dir.as_deref(), &config.catalog.data_dir);
    info!("Data directory: {}", data_dir.display());

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    web::run_server(config, data_dir, addr).await
}
