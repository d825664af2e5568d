//! lyra-fs (File Storage) - multipart upload service
//!
//! Validates uploads and stores them in an S3-compatible bucket,
//! returning public URLs the catalog records as audio/image locations.

use anyhow::{bail, Result};
use clap::Parser;
use lyra_common::config::{self, FileConfig};
use lyra_fs::store::{ObjectStore, StoreSettings};
use lyra_fs::{build_router, AppState};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "lyra-fs", about = "Lyra file storage service")]
struct Args {
    /// Port to listen on (loopback only)
    #[arg(long, env = "LYRA_FS_PORT", default_value_t = config::STORAGE_PORT)]
    port: u16,

    /// Bucket receiving uploads
    #[arg(long, env = "LYRA_S3_BUCKET")]
    bucket: Option<String>,

    /// Base URL prefixed to object keys in responses
    #[arg(long, env = "LYRA_S3_PUBLIC_URL")]
    public_base_url: Option<String>,

    /// Endpoint override for S3-compatible stores (MinIO etc.)
    #[arg(long, env = "LYRA_S3_ENDPOINT")]
    endpoint_url: Option<String>,

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

    info!(
        "Starting Lyra File Storage (lyra-fs) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let file_config = FileConfig::load(args.config.as_ref())?;

    let Some(bucket) = args.bucket.or(file_config.storage.bucket) else {
        bail!("missing required configuration: bucket (--bucket or LYRA_S3_BUCKET)");
    };

    // Without an explicit public base URL, fall back to the virtual-host
    // style S3 URL for the bucket
    let public_base_url = args
        .public_base_url
        .or(file_config.storage.public_base_url)
        .unwrap_or_else(|| format!("https://{bucket}.s3.amazonaws.com"));

    let endpoint_url = args.endpoint_url.or(file_config.storage.endpoint_url);

    let store = ObjectStore::connect(StoreSettings {
        bucket,
        public_base_url,
        endpoint_url,
    })
    .await;

    let state = AppState::new(store);
    let app = build_router(state);

    let bind_addr = format!("127.0.0.1:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("lyra-fs listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
