//! Integration tests for lyra-pl API endpoints
//!
//! Runs the full router over a no-op backend; audio hardware is never
//! touched. The backend event channel is driven by hand to exercise the
//! pump path.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use lyra_pl::backend::{AudioBackend, BackendEvent};
use lyra_pl::{build_router, sse, AppState};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tower::util::ServiceExt; // for `oneshot`
use uuid::Uuid;

/// Accepts every command and does nothing
struct NoopBackend;

impl AudioBackend for NoopBackend {
    fn play(&mut self, _token: u64, _url: &str) {}
    fn pause(&mut self) {}
    fn resume(&mut self) {}
    fn stop(&mut self) {}
    fn seek(&mut self, _position: f64) {}
    fn set_volume(&mut self, _volume: f32) {}
}

fn setup() -> (axum::Router, mpsc::UnboundedSender<BackendEvent>) {
    let events = sse::event_channel();
    let (backend_tx, backend_rx) = mpsc::unbounded_channel();
    let state = AppState::new(Box::new(NoopBackend), events, backend_rx);
    (build_router(state), backend_tx)
}

fn song_json(title: &str, audio_url: Option<&str>) -> Value {
    json!({
        "guid": Uuid::new_v4(),
        "title": title,
        "duration": 180.0,
        "artist_guid": Uuid::new_v4(),
        "artist_name": "Test Artist",
        "album_guid": Uuid::new_v4(),
        "album_name": "Test Album",
        "image_url": null,
        "audio_url": audio_url,
    })
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse JSON")
}

async fn call(app: &axum::Router, req: Request<Body>) -> Value {
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    extract_json(response.into_body()).await
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _tx) = setup();

    let body = call(&app, request("GET", "/health", None)).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "lyra-pl");
}

#[tokio::test]
async fn test_initial_state_is_idle() {
    let (app, _tx) = setup();

    let body = call(&app, request("GET", "/playback/state", None)).await;
    assert_eq!(body["transport"], "Idle");
    assert_eq!(body["is_playing"], false);
    assert_eq!(body["current_index"], -1);
    assert!(body["current_song"].is_null());
    assert_eq!(body["volume"], 1.0);
}

#[tokio::test]
async fn test_play_with_audio_reports_playing() {
    let (app, _tx) = setup();

    let body = call(
        &app,
        request(
            "POST",
            "/playback/play",
            Some(json!({ "song": song_json("track", Some("https://cdn.example.com/track.mp3")) })),
        ),
    )
    .await;

    assert_eq!(body["is_playing"], true);
    assert_eq!(body["transport"], "Playing");
    assert_eq!(body["current_song"]["title"], "track");
    assert_eq!(body["position"], 0.0);
}

#[tokio::test]
async fn test_play_without_audio_stays_selected() {
    let (app, _tx) = setup();

    let body = call(
        &app,
        request(
            "POST",
            "/playback/play",
            Some(json!({ "song": song_json("silent", None) })),
        ),
    )
    .await;

    assert_eq!(body["is_playing"], false);
    assert_eq!(body["transport"], "Selected");
    assert_eq!(body["current_song"]["title"], "silent");
}

#[tokio::test]
async fn test_playlist_next_wraps_through_api() {
    let (app, _tx) = setup();

    let songs = vec![
        song_json("a", Some("https://cdn.example.com/a.mp3")),
        song_json("b", Some("https://cdn.example.com/b.mp3")),
        song_json("c", Some("https://cdn.example.com/c.mp3")),
    ];

    call(
        &app,
        request(
            "PUT",
            "/playback/playlist",
            Some(json!({ "songs": songs.clone() })),
        ),
    )
    .await;

    // Select the last entry, then advance: wraps to index 0
    call(
        &app,
        request(
            "POST",
            "/playback/play",
            Some(json!({ "song": songs[2].clone() })),
        ),
    )
    .await;

    let body = call(&app, request("POST", "/playback/next", None)).await;
    assert_eq!(body["current_index"], 0);
    assert_eq!(body["current_song"]["title"], "a");

    let body = call(&app, request("POST", "/playback/previous", None)).await;
    assert_eq!(body["current_index"], 2);
}

#[tokio::test]
async fn test_volume_endpoint_clamps() {
    let (app, _tx) = setup();

    let body = call(
        &app,
        request("POST", "/playback/volume", Some(json!({ "volume": 2.5 }))),
    )
    .await;
    assert_eq!(body["volume"], 1.0);

    let body = call(
        &app,
        request("POST", "/playback/volume", Some(json!({ "volume": -1.0 }))),
    )
    .await;
    assert_eq!(body["volume"], 0.0);
}

#[tokio::test]
async fn test_playlist_replacement_without_current_resets_to_idle() {
    let (app, _tx) = setup();

    call(
        &app,
        request(
            "POST",
            "/playback/play",
            Some(json!({ "song": song_json("orphan", Some("https://cdn.example.com/o.mp3")) })),
        ),
    )
    .await;

    let body = call(
        &app,
        request(
            "PUT",
            "/playback/playlist",
            Some(json!({ "songs": [song_json("other", None)] })),
        ),
    )
    .await;

    assert_eq!(body["transport"], "Idle");
    assert!(body["current_song"].is_null());
    assert_eq!(body["current_index"], -1);
}

#[tokio::test]
async fn test_backend_failure_reverts_via_pump() {
    let (app, tx) = setup();

    call(
        &app,
        request(
            "POST",
            "/playback/play",
            Some(json!({ "song": song_json("flaky", Some("https://cdn.example.com/f.mp3")) })),
        ),
    )
    .await;

    // First load of this player instance carries token 1
    tx.send(BackendEvent::Failed {
        token: 1,
        message: "fetch: HTTP 404".to_string(),
    })
    .expect("pump alive");

    // Give the pump task a moment to apply the event
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let body = call(&app, request("GET", "/playback/state", None)).await;
    assert_eq!(body["is_playing"], false);
    assert_eq!(body["transport"], "Selected");
    assert_eq!(body["current_song"]["title"], "flaky");
}
