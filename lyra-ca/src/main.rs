//! lyra-ca (Catalog) - CRUD and search over songs, artists and albums
//!
//! Owns the shared SQLite catalog database. All other services reach the
//! catalog through this HTTP API.

use anyhow::Result;
use clap::Parser;
use lyra_ca::{build_router, seed, AppState};
use lyra_common::config::{self, FileConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "lyra-ca", about = "Lyra catalog service")]
struct Args {
    /// Port to listen on (loopback only)
    #[arg(long, env = "LYRA_CA_PORT", default_value_t = config::CATALOG_PORT)]
    port: u16,

    /// Data directory holding the catalog database
    #[arg(long, env = "LYRA_ROOT")]
    root_folder: Option<PathBuf>,

    /// Explicit config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Insert the demo catalog when the database is empty
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting Lyra Catalog (lyra-ca) v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let file_config = FileConfig::load(args.config.as_ref())?;

    let root_folder = config::resolve_root_folder(args.root_folder.as_ref(), &file_config);
    let db_path = config::database_path(&root_folder)?;
    info!("Database path: {}", db_path.display());

    let pool = lyra_common::db::init_database(&db_path).await?;

    if args.seed {
        seed::seed_if_empty(&pool).await?;
    }

    let state = AppState::new(pool);
    let app = build_router(state);

    let bind_addr = format!("127.0.0.1:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("lyra-ca listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
