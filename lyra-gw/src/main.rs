//! lyra-gw (Gateway) - single entry point for UI clients
//!
//! Serves the web UI and forwards catalog and upload calls to the
//! services that own them.

use anyhow::Result;
use clap::Parser;
use lyra_common::config::{self, FileConfig};
use lyra_gw::{build_router, AppState};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "lyra-gw", about = "Lyra gateway service")]
struct Args {
    /// Port to listen on (loopback only)
    #[arg(long, env = "LYRA_GW_PORT", default_value_t = config::GATEWAY_PORT)]
    port: u16,

    /// Catalog service base URL
    #[arg(long, env = "LYRA_CATALOG_URL")]
    catalog_url: Option<String>,

    /// Storage service base URL
    #[arg(long, env = "LYRA_STORAGE_URL")]
    storage_url: Option<String>,

    /// Explicit config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting Lyra Gateway (lyra-gw) v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let file_config = FileConfig::load(args.config.as_ref())?;

    let catalog_url = args
        .catalog_url
        .or(file_config.gateway.catalog_url)
        .unwrap_or_else(|| format!("http://127.0.0.1:{}", config::CATALOG_PORT));
    let storage_url = args
        .storage_url
        .or(file_config.gateway.storage_url)
        .unwrap_or_else(|| format!("http://127.0.0.1:{}", config::STORAGE_PORT));

    info!("Forwarding catalog calls to {}", catalog_url);
    info!("Forwarding upload calls to {}", storage_url);

    let state = AppState::new(catalog_url, storage_url);
    let app = build_router(state);

    let bind_addr = format!("127.0.0.1:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("lyra-gw listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
