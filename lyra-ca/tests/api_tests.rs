//! Integration tests for lyra-ca API endpoints
//!
//! Exercises the full router against an in-memory database: CRUD round
//! trips per entity, pagination clamping, search, validation failures
//! and referential integrity conflicts.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use lyra_ca::{build_router, AppState};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

async fn setup_app() -> axum::Router {
    let pool = lyra_common::db::init::init_memory_database()
        .await
        .expect("in-memory database");
    build_router(AppState::new(pool))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse JSON")
}

/// Create one artist/album/song chain; returns (artist, album, song) guids
async fn seed_chain(app: &axum::Router) -> (String, String, String) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/artists",
            json!({ "name": "Queen" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let artist = extract_json(response.into_body()).await;
    let artist_guid = artist["guid"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/albums",
            json!({ "name": "A Night at the Opera", "year": 1975, "artist_guid": artist_guid.clone() }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let album = extract_json(response.into_body()).await;
    let album_guid = album["guid"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/songs",
            json!({
                "title": "Bohemian Rhapsody",
                "duration": 355.0,
                "artist_guid": artist_guid.clone(),
                "album_guid": album_guid.clone(),
                "audio_url": "https://cdn.example.com/bohemian.mp3"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let song = extract_json(response.into_body()).await;
    let song_guid = song["guid"].as_str().unwrap().to_string();

    (artist_guid, album_guid, song_guid)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "lyra-ca");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_song_crud_round_trip() {
    let app = setup_app().await;
    let (_, _, song_guid) = seed_chain(&app).await;

    // Read back, joined with names
    let response = app
        .clone()
        .oneshot(get(&format!("/api/songs/{song_guid}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["title"], "Bohemian Rhapsody");
    assert_eq!(body["artist_name"], "Queen");
    assert_eq!(body["album_name"], "A Night at the Opera");

    // Partial update leaves other fields alone
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/songs/{song_guid}"),
            json!({ "title": "Bohemian Rhapsody (2011 Remaster)" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["title"], "Bohemian Rhapsody (2011 Remaster)");
    assert_eq!(body["duration"], 355.0);

    // Delete, then 404
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/songs/{song_guid}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get(&format!("/api/songs/{song_guid}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_song_list_pagination_defaults_and_clamp() {
    let app = setup_app().await;
    seed_chain(&app).await;

    let response = app.clone().oneshot(get("/api/songs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 20);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["has_next"], false);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Oversized limit is clamped to 100
    let response = app
        .oneshot(get("/api/songs?page=1&limit=1000"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["pagination"]["limit"], 100);
}

#[tokio::test]
async fn test_song_search_matches_artist_and_album_names() {
    let app = setup_app().await;
    seed_chain(&app).await;

    for q in ["bohemian", "QUEEN", "night at the opera"] {
        let response = app
            .clone()
            .oneshot(get(&format!("/api/songs/search?q={}", q.replace(' ', "+"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "query {q:?}");
        let body = extract_json(response.into_body()).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1, "query {q:?}");
    }

    let response = app
        .oneshot(get("/api/songs/search?q=zeppelin"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_search_query_rejected() {
    let app = setup_app().await;

    let response = app
        .oneshot(get("/api/songs/search?q=%20%20"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validation_failures() {
    let app = setup_app().await;

    // Blank artist name
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/artists",
            json!({ "name": "   " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Album year out of range
    let (artist_guid, _, _) = seed_chain(&app).await;
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/albums",
            json!({ "name": "Future Album", "year": 3000, "artist_guid": artist_guid }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Song referencing unknown artist/album
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/songs",
            json!({
                "title": "Orphan",
                "artist_guid": uuid::Uuid::new_v4(),
                "album_guid": uuid::Uuid::new_v4()
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Malformed id
    let response = app.oneshot(get("/api/songs/not-a-uuid")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_artist_delete_conflict_while_referenced() {
    let app = setup_app().await;
    let (artist_guid, album_guid, song_guid) = seed_chain(&app).await;

    let delete = |uri: String| {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    };

    let response = app
        .clone()
        .oneshot(delete(format!("/api/artists/{artist_guid}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Remove dependents bottom-up, then the artist goes away
    let response = app
        .clone()
        .oneshot(delete(format!("/api/songs/{song_guid}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(delete(format!("/api/albums/{album_guid}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(delete(format!("/api/artists/{artist_guid}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
