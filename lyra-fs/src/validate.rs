//! Upload validation
//!
//! Size and MIME checks run before anything touches the bucket. The
//! declared content type must be on the allowlist, and when the payload
//! itself sniffs as a known type, that type must be allowlisted too:
//! a renamed executable does not become audio by declaring audio/mpeg.

use crate::api::UploadError;

/// Maximum accepted upload size (50 MB)
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Accepted declared MIME types: audio formats plus cover imagery
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/x-wav",
    "audio/ogg",
    "audio/m4a",
    "audio/mp4",
    "audio/aac",
    "audio/flac",
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
];

fn allowed(mime: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime)
}

/// Validate an upload and resolve the content type to store.
///
/// Returns the sniffed type when detection succeeds (more trustworthy
/// than the client's declaration), otherwise the declared type.
pub fn check_upload(declared_mime: &str, bytes: &[u8]) -> Result<String, UploadError> {
    if bytes.is_empty() {
        return Err(UploadError::EmptyFile);
    }

    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge {
            size: bytes.len(),
            max: MAX_UPLOAD_BYTES,
        });
    }

    if !allowed(declared_mime) {
        return Err(UploadError::UnsupportedType(declared_mime.to_string()));
    }

    if let Some(kind) = infer::get(bytes) {
        let sniffed = kind.mime_type();
        if !allowed(sniffed) {
            return Err(UploadError::UnsupportedType(sniffed.to_string()));
        }
        return Ok(sniffed.to_string());
    }

    Ok(declared_mime.to_string())
}
