//! Request field validation
//!
//! Explicit checks per handler; violations become 400 responses.

use crate::api::ApiError;
use chrono::Datelike;

/// Maximum length for titles and names
pub const MAX_NAME_LEN: usize = 255;

/// Earliest accepted album year
pub const MIN_YEAR: i64 = 1900;

/// Require a non-blank string no longer than MAX_NAME_LEN
pub fn name(value: &str, field: &str) -> Result<(), ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Invalid(format!("{field} must not be empty")));
    }
    if trimmed.len() > MAX_NAME_LEN {
        return Err(ApiError::Invalid(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Require a strictly positive duration when present
pub fn duration(value: Option<f64>) -> Result<(), ApiError> {
    match value {
        Some(d) if !d.is_finite() || d <= 0.0 => {
            Err(ApiError::Invalid("duration must be positive".to_string()))
        }
        _ => Ok(()),
    }
}

/// Require a plausible album year when present
pub fn year(value: Option<i64>) -> Result<(), ApiError> {
    let current = chrono::Utc::now().year() as i64;
    match value {
        Some(y) if y < MIN_YEAR || y > current => Err(ApiError::Invalid(format!(
            "year must be between {MIN_YEAR} and {current}"
        ))),
        _ => Ok(()),
    }
}

/// Require an http(s) URL when present
pub fn url(value: Option<&str>, field: &str) -> Result<(), ApiError> {
    match value {
        Some(u) if !(u.starts_with("http://") || u.starts_with("https://")) => Err(
            ApiError::Invalid(format!("{field} must be an http(s) URL")),
        ),
        _ => Ok(()),
    }
}
