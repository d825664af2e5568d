//! lyra-pl (Player) - playback state machine and audio output
//!
//! Owns the machine's audio device through the rodio backend. UI clients
//! drive transport over HTTP and follow state through /events.

use anyhow::Result;
use clap::Parser;
use lyra_common::config;
use lyra_pl::backend::output::RodioBackend;
use lyra_pl::{build_router, sse, AppState};
use tokio::sync::mpsc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "lyra-pl", about = "Lyra player service")]
struct Args {
    /// Port to listen on (loopback only)
    #[arg(long, env = "LYRA_PL_PORT", default_value_t = config::PLAYER_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting Lyra Player (lyra-pl) v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let events = sse::event_channel();
    let (backend_tx, backend_rx) = mpsc::unbounded_channel();
    let backend = RodioBackend::spawn(backend_tx);

    let state = AppState::new(Box::new(backend), events, backend_rx);
    let app = build_router(state);

    let bind_addr = format!("127.0.0.1:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("lyra-pl listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
