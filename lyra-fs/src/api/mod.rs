//! HTTP API handlers for lyra-fs

pub mod health;
pub mod upload;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lyra_common::api::ErrorResponse;
use thiserror::Error;
use tracing::error;

/// Upload pipeline errors mapped onto HTTP statuses
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("no file uploaded")]
    MissingFile,

    #[error("uploaded file is empty")]
    EmptyFile,

    #[error("file too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("malformed multipart request: {0}")]
    Multipart(String),

    #[error("storage failure: {0}")]
    Storage(#[from] lyra_common::Error),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            UploadError::MissingFile | UploadError::EmptyFile | UploadError::Multipart(_) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(self.to_string()))
            }
            UploadError::TooLarge { max, .. } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_details(
                    "file too large",
                    format!("maximum size is {} MB", max / (1024 * 1024)),
                ),
            ),
            UploadError::UnsupportedType(_) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                ErrorResponse::new(self.to_string()),
            ),
            UploadError::Storage(e) => {
                error!("Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("failed to store file"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
