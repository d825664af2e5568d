//! HTTP API handlers for lyra-ca

pub mod albums;
pub mod artists;
pub mod health;
pub mod songs;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lyra_common::api::ErrorResponse;
use tracing::error;

/// Handler-level errors mapped onto HTTP statuses
#[derive(Debug)]
pub enum ApiError {
    /// Request failed field validation
    Invalid(String),
    /// Entity id does not exist
    NotFound(String),
    /// Referential integrity prevents the operation
    Conflict(String),
    /// Underlying database failure
    Database(sqlx::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Database(e)
    }
}

impl ApiError {
    /// Classify a write failure: foreign key violations come back as
    /// client errors, everything else stays a 500.
    pub fn from_write_error(e: sqlx::Error, fk_message: &str) -> Self {
        let is_fk = e
            .as_database_error()
            .map(|d| matches!(d.kind(), sqlx::error::ErrorKind::ForeignKeyViolation))
            .unwrap_or(false);

        if is_fk {
            ApiError::Invalid(fk_message.to_string())
        } else {
            ApiError::Database(e)
        }
    }

    /// Like `from_write_error` but for deletes, where a foreign key
    /// violation means dependent rows still reference the entity.
    pub fn from_delete_error(e: sqlx::Error, conflict_message: &str) -> Self {
        let is_fk = e
            .as_database_error()
            .map(|d| matches!(d.kind(), sqlx::error::ErrorKind::ForeignKeyViolation))
            .unwrap_or(false);

        if is_fk {
            ApiError::Conflict(conflict_message.to_string())
        } else {
            ApiError::Database(e)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Invalid(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::new(msg)),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, ErrorResponse::new(msg)),
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("database error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
