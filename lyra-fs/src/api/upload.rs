//! Multipart upload and delete handlers

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use lyra_common::api::UploadResponse;
use tracing::info;

use super::UploadError;
use crate::store::object_key;
use crate::validate::check_upload;
use crate::AppState;

/// Default folder prefix when the form does not name one
const DEFAULT_FOLDER: &str = "songs";

struct UploadParts {
    file_name: String,
    declared_mime: String,
    bytes: Vec<u8>,
    folder: String,
}

/// Pull the `file` part (and optional `folder` text part) out of the form
async fn read_multipart(mut multipart: Multipart) -> Result<UploadParts, UploadError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut folder = DEFAULT_FOLDER.to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field
                    .file_name()
                    .unwrap_or("upload.bin")
                    .to_string();
                let declared_mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| UploadError::Multipart(e.to_string()))?;
                file = Some((file_name, declared_mime, bytes.to_vec()));
            }
            Some("folder") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| UploadError::Multipart(e.to_string()))?;
                let trimmed = text.trim().trim_matches('/');
                if !trimmed.is_empty() {
                    folder = trimmed.to_string();
                }
            }
            _ => {}
        }
    }

    let (file_name, declared_mime, bytes) = file.ok_or(UploadError::MissingFile)?;
    Ok(UploadParts {
        file_name,
        declared_mime,
        bytes,
        folder,
    })
}

/// POST /api/upload
///
/// Validates size and MIME type, stores the object, returns its public
/// URL. Nothing is written to the bucket unless validation passes.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, UploadError> {
    let parts = read_multipart(multipart).await?;

    let mime_type = check_upload(&parts.declared_mime, &parts.bytes)?;
    let size = parts.bytes.len() as u64;
    let key = object_key(&parts.folder, &parts.file_name);

    let url = state.store.put(&key, parts.bytes, &mime_type).await?;

    info!(
        "Stored {} ({} bytes, {}) at {}",
        parts.file_name, size, mime_type, key
    );

    Ok(Json(UploadResponse {
        success: true,
        url,
        key,
        original_name: parts.file_name,
        size,
        mime_type,
    }))
}

/// DELETE /api/upload/:key
///
/// Key is the full object key, URL-encoded by the caller when it
/// contains slashes.
pub async fn delete(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode, UploadError> {
    if key.trim().is_empty() {
        return Err(UploadError::Multipart("file key is required".to_string()));
    }

    state.store.delete(&key).await?;
    info!("Deleted object {}", key);

    Ok(StatusCode::NO_CONTENT)
}
