//! Object store access
//!
//! Thin wrapper over the S3 client: one bucket, put/delete, and public
//! URL construction. Supports S3-compatible stores through an endpoint
//! override with forced path-style addressing.

use aws_sdk_s3::primitives::ByteStream;
use lyra_common::{Error, Result};
use tracing::info;

/// Cache objects for a year; uploads are content-addressed by uuid key
/// so stale caches are never wrong
const CACHE_CONTROL: &str = "max-age=31536000";

/// Settings needed to reach the bucket
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub bucket: String,
    /// Base URL prefixed to keys when building public URLs
    pub public_base_url: String,
    /// Endpoint override for S3-compatible stores (MinIO etc.)
    pub endpoint_url: Option<String>,
}

/// One-bucket object store
#[derive(Clone)]
pub struct ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl ObjectStore {
    /// Build the S3 client from the default provider chain, applying the
    /// endpoint override when configured.
    pub async fn connect(settings: StoreSettings) -> Self {
        let cfg = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        let mut builder = aws_sdk_s3::config::Builder::from(&cfg);
        if let Some(url) = &settings.endpoint_url {
            builder = builder.endpoint_url(url).force_path_style(true);
        }

        let client = aws_sdk_s3::Client::from_conf(builder.build());
        info!("Object store ready (bucket: {})", settings.bucket);

        Self::new(client, settings.bucket, settings.public_base_url)
    }

    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Store an object and return its public URL
    pub async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .cache_control(CACHE_CONTROL)
            .send()
            .await
            .map_err(|e| Error::Internal(format!("put_object {key}: {e}")))?;

        Ok(self.public_url(key))
    }

    /// Remove an object; missing keys are not an error in S3 semantics
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::Internal(format!("delete_object {key}: {e}")))?;

        Ok(())
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

/// Object key for an upload: `{folder}/{uuid}_{original_name}`, with the
/// original name reduced to a safe character set.
pub fn object_key(folder: &str, original_name: &str) -> String {
    let safe_name: String = original_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!("{}/{}_{}", folder, uuid::Uuid::new_v4(), safe_name)
}
