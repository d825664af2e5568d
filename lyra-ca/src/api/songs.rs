//! Song CRUD and search handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use lyra_common::api::{PageQuery, Paginated, SearchQuery};
use lyra_common::db::models::{Song, SongRow};
use lyra_common::pagination::paginate;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::ApiError;
use crate::db::songs;
use crate::db::songs::SongUpdate;
use crate::{validate, AppState};

/// POST /api/songs body
#[derive(Debug, Deserialize)]
pub struct CreateSong {
    pub title: String,
    pub duration: Option<f64>,
    pub artist_guid: Uuid,
    pub album_guid: Uuid,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
}

/// PUT /api/songs/:id body; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateSong {
    pub title: Option<String>,
    pub duration: Option<f64>,
    pub artist_guid: Option<Uuid>,
    pub album_guid: Option<Uuid>,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
}

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::Invalid(format!("invalid song id: {id}")))
}

/// GET /api/songs?page&limit
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<Song>>, ApiError> {
    let total = songs::count(&state.db).await?;
    let p = paginate(total, query.page, query.limit);
    let data = songs::list(&state.db, p.limit, p.offset).await?;

    Ok(Json(Paginated {
        data,
        pagination: p.into(),
    }))
}

/// GET /api/songs/search?q=...
///
/// Case-insensitive substring match over song title, artist name and
/// album name.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Paginated<Song>>, ApiError> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(ApiError::Invalid("search query must not be empty".to_string()));
    }

    let total = songs::count_search(&state.db, q).await?;
    let p = paginate(total, query.page, query.limit);
    let data = songs::search(&state.db, q, p.limit, p.offset).await?;

    Ok(Json(Paginated {
        data,
        pagination: p.into(),
    }))
}

/// GET /api/songs/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Song>, ApiError> {
    let guid = parse_id(&id)?;
    songs::get(&state.db, guid)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("song not found: {id}")))
}

/// POST /api/songs
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateSong>,
) -> Result<(StatusCode, Json<Song>), ApiError> {
    validate::name(&body.title, "title")?;
    validate::duration(body.duration)?;
    validate::url(body.image_url.as_deref(), "image_url")?;
    validate::url(body.audio_url.as_deref(), "audio_url")?;

    let row = SongRow {
        guid: Uuid::new_v4(),
        title: body.title.trim().to_string(),
        duration: body.duration,
        artist_guid: body.artist_guid,
        album_guid: body.album_guid,
        image_url: body.image_url,
        audio_url: body.audio_url,
    };

    songs::insert(&state.db, &row)
        .await
        .map_err(|e| ApiError::from_write_error(e, "unknown artist or album"))?;

    info!("Created song {} ({})", row.title, row.guid);

    let created = songs::get(&state.db, row.guid)
        .await?
        .ok_or_else(|| ApiError::NotFound("song vanished after insert".to_string()))?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/songs/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateSong>,
) -> Result<Json<Song>, ApiError> {
    let guid = parse_id(&id)?;

    if let Some(title) = &body.title {
        validate::name(title, "title")?;
    }
    validate::duration(body.duration)?;
    validate::url(body.image_url.as_deref(), "image_url")?;
    validate::url(body.audio_url.as_deref(), "audio_url")?;

    let changes = SongUpdate {
        title: body.title.map(|t| t.trim().to_string()),
        duration: body.duration,
        artist_guid: body.artist_guid,
        album_guid: body.album_guid,
        image_url: body.image_url,
        audio_url: body.audio_url,
    };

    let changed = songs::update(&state.db, guid, &changes)
        .await
        .map_err(|e| ApiError::from_write_error(e, "unknown artist or album"))?;
    if !changed {
        return Err(ApiError::NotFound(format!("song not found: {id}")));
    }

    let updated = songs::get(&state.db, guid)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("song not found: {id}")))?;

    Ok(Json(updated))
}

/// DELETE /api/songs/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let guid = parse_id(&id)?;

    let deleted = songs::delete(&state.db, guid).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("song not found: {id}")));
    }

    info!("Deleted song {}", id);
    Ok(StatusCode::NO_CONTENT)
}
