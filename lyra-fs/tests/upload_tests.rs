//! Router-level tests for lyra-fs
//!
//! Rejection paths only: every request here fails validation before the
//! store is touched, so a client with an unroutable endpoint is safe to
//! use as state.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use lyra_fs::store::ObjectStore;
use lyra_fs::{build_router, AppState};
use tower::util::ServiceExt; // for `oneshot`

const BOUNDARY: &str = "lyra-test-boundary";

fn setup_app() -> axum::Router {
    let conf = aws_sdk_s3::Config::builder()
        .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
        .region(aws_sdk_s3::config::Region::new("us-east-1"))
        .endpoint_url("http://127.0.0.1:1")
        .build();
    let store = ObjectStore::new(
        aws_sdk_s3::Client::from_conf(conf),
        "test-bucket".to_string(),
        "https://cdn.example.com".to_string(),
    );
    build_router(AppState::new(store))
}

/// Build a multipart body with a single file part
fn multipart_file(name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn extract_json(body: Body) -> serde_json::Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse JSON")
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["module"], "lyra-fs");
}

#[tokio::test]
async fn test_upload_without_file_part_rejected() {
    let app = setup_app();

    // Form with only a folder part
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"folder\"\r\n\r\ncovers");
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let response = app.oneshot(upload_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "no file uploaded");
}

#[tokio::test]
async fn test_upload_unsupported_declared_type_rejected() {
    let app = setup_app();

    let body = multipart_file("notes.txt", "text/plain", b"hello");
    let response = app.oneshot(upload_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_upload_disguised_payload_rejected() {
    let app = setup_app();

    // ZIP magic bytes declared as audio
    let mut zip = vec![0x50, 0x4B, 0x03, 0x04];
    zip.extend_from_slice(&[0u8; 32]);

    let body = multipart_file("song.mp3", "audio/mpeg", &zip);
    let response = app.oneshot(upload_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_upload_empty_file_rejected() {
    let app = setup_app();

    let body = multipart_file("song.mp3", "audio/mpeg", b"");
    let response = app.oneshot(upload_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
