//! Castle planning service.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use castle_headless::{load_catalog, resolve_data_dir};
use castle_server::{bind, serve, ServerConfig, SolverService};

#[derive(Parser)]
#[command(name = "castle_server")]
#[command(about = "Build-order planning service (JSON lines over TCP)")]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = ServerConfig::default().port)]
    port: u16,

    /// Address to bind to
    #[arg(long, default_value_t = ServerConfig::default().host)]
    host: String,

    /// Game data directory (defaults to $CASTLE_DATA_DIR, then `data`)
    #[arg(long)]
    data: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting castle planning service");

    let data_dir = resolve_data_dir(cli.data.as_deref());
    let catalog = match load_catalog(&data_dir) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Failed to load game data from {}: {e}", data_dir.display());
            std::process::exit(1);
        }
    };

    let listener = match bind(&cli.host, cli.port).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = serve(listener, Arc::new(SolverService::new(catalog))).await {
        eprintln!("Server stopped: {e}");
        std::process::exit(1);
    }
}
