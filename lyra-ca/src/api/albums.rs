//! Album CRUD and search handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use lyra_common::api::{PageQuery, Paginated, SearchQuery};
use lyra_common::db::models::{Album, AlbumDetail};
use lyra_common::pagination::paginate;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::ApiError;
use crate::db::albums;
use crate::db::albums::AlbumUpdate;
use crate::{validate, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateAlbum {
    pub name: String,
    pub year: Option<i64>,
    pub artist_guid: Uuid,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAlbum {
    pub name: Option<String>,
    pub year: Option<i64>,
    pub artist_guid: Option<Uuid>,
    pub image_url: Option<String>,
}

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::Invalid(format!("invalid album id: {id}")))
}

/// GET /api/albums?page&limit
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<AlbumDetail>>, ApiError> {
    let total = albums::count(&state.db).await?;
    let p = paginate(total, query.page, query.limit);
    let data = albums::list(&state.db, p.limit, p.offset).await?;

    Ok(Json(Paginated {
        data,
        pagination: p.into(),
    }))
}

/// GET /api/albums/search?q=...
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Paginated<AlbumDetail>>, ApiError> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(ApiError::Invalid("search query must not be empty".to_string()));
    }

    let total = albums::count_search(&state.db, q).await?;
    let p = paginate(total, query.page, query.limit);
    let data = albums::search(&state.db, q, p.limit, p.offset).await?;

    Ok(Json(Paginated {
        data,
        pagination: p.into(),
    }))
}

/// GET /api/albums/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AlbumDetail>, ApiError> {
    let guid = parse_id(&id)?;
    albums::get(&state.db, guid)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("album not found: {id}")))
}

/// POST /api/albums
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateAlbum>,
) -> Result<(StatusCode, Json<AlbumDetail>), ApiError> {
    validate::name(&body.name, "name")?;
    validate::year(body.year)?;
    validate::url(body.image_url.as_deref(), "image_url")?;

    let album = Album {
        guid: Uuid::new_v4(),
        name: body.name.trim().to_string(),
        year: body.year,
        artist_guid: body.artist_guid,
        image_url: body.image_url,
    };

    albums::insert(&state.db, &album)
        .await
        .map_err(|e| ApiError::from_write_error(e, "unknown artist"))?;

    info!("Created album {} ({})", album.name, album.guid);

    let created = albums::get(&state.db, album.guid)
        .await?
        .ok_or_else(|| ApiError::NotFound("album vanished after insert".to_string()))?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/albums/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateAlbum>,
) -> Result<Json<AlbumDetail>, ApiError> {
    let guid = parse_id(&id)?;

    if let Some(name) = &body.name {
        validate::name(name, "name")?;
    }
    validate::year(body.year)?;
    validate::url(body.image_url.as_deref(), "image_url")?;

    let changes = AlbumUpdate {
        name: body.name.map(|n| n.trim().to_string()),
        year: body.year,
        artist_guid: body.artist_guid,
        image_url: body.image_url,
    };

    let changed = albums::update(&state.db, guid, &changes)
        .await
        .map_err(|e| ApiError::from_write_error(e, "unknown artist"))?;
    if !changed {
        return Err(ApiError::NotFound(format!("album not found: {id}")));
    }

    let updated = albums::get(&state.db, guid)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("album not found: {id}")))?;

    Ok(Json(updated))
}

/// DELETE /api/albums/:id
///
/// Refused with 409 while songs still reference the album.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let guid = parse_id(&id)?;

    let deleted = albums::delete(&state.db, guid)
        .await
        .map_err(|e| ApiError::from_delete_error(e, "album still has songs"))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("album not found: {id}")));
    }

    info!("Deleted album {}", id);
    Ok(StatusCode::NO_CONTENT)
}
