//! Upload forwarding
//!
//! The inbound multipart form is re-assembled and streamed to the
//! storage service; validation and bucket access both live there.

use axum::extract::{Multipart, Path, State};

use crate::upstream::{GatewayError, Relay};
use crate::AppState;

/// POST /api/upload
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Relay, GatewayError> {
    let mut form = reqwest::multipart::Form::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::BadUpstream {
            upstream: "storage".to_string(),
            message: format!("malformed multipart request: {e}"),
        })?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        let bytes = field
            .bytes()
            .await
            .map_err(|e| GatewayError::BadUpstream {
                upstream: "storage".to_string(),
                message: format!("malformed multipart request: {e}"),
            })?;

        let mut part = reqwest::multipart::Part::bytes(bytes.to_vec());
        if let Some(file_name) = file_name {
            part = part.file_name(file_name);
        }
        if let Some(content_type) = content_type {
            part = part
                .mime_str(&content_type)
                .map_err(|e| GatewayError::BadUpstream {
                    upstream: "storage".to_string(),
                    message: format!("invalid content type: {e}"),
                })?;
        }

        form = form.part(name, part);
    }

    state.storage.post_multipart("/api/upload", form).await
}

/// DELETE /api/upload/:key
pub async fn delete(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Relay, GatewayError> {
    // Re-encode the key so slashes survive the hop
    let encoded = key.replace('/', "%2F");
    state.storage.delete(&format!("/api/upload/{encoded}")).await
}
