//! Artist CRUD and search handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use lyra_common::api::{PageQuery, Paginated, SearchQuery};
use lyra_common::db::models::Artist;
use lyra_common::pagination::paginate;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::ApiError;
use crate::db::artists;
use crate::db::artists::ArtistUpdate;
use crate::{validate, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateArtist {
    pub name: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateArtist {
    pub name: Option<String>,
    pub image_url: Option<String>,
}

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::Invalid(format!("invalid artist id: {id}")))
}

/// GET /api/artists?page&limit
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<Artist>>, ApiError> {
    let total = artists::count(&state.db).await?;
    let p = paginate(total, query.page, query.limit);
    let data = artists::list(&state.db, p.limit, p.offset).await?;

    Ok(Json(Paginated {
        data,
        pagination: p.into(),
    }))
}

/// GET /api/artists/search?q=...
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Paginated<Artist>>, ApiError> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(ApiError::Invalid("search query must not be empty".to_string()));
    }

    let total = artists::count_search(&state.db, q).await?;
    let p = paginate(total, query.page, query.limit);
    let data = artists::search(&state.db, q, p.limit, p.offset).await?;

    Ok(Json(Paginated {
        data,
        pagination: p.into(),
    }))
}

/// GET /api/artists/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Artist>, ApiError> {
    let guid = parse_id(&id)?;
    artists::get(&state.db, guid)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("artist not found: {id}")))
}

/// POST /api/artists
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateArtist>,
) -> Result<(StatusCode, Json<Artist>), ApiError> {
    validate::name(&body.name, "name")?;
    validate::url(body.image_url.as_deref(), "image_url")?;

    let artist = Artist {
        guid: Uuid::new_v4(),
        name: body.name.trim().to_string(),
        image_url: body.image_url,
    };

    artists::insert(&state.db, &artist).await?;
    info!("Created artist {} ({})", artist.name, artist.guid);

    Ok((StatusCode::CREATED, Json(artist)))
}

/// PUT /api/artists/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateArtist>,
) -> Result<Json<Artist>, ApiError> {
    let guid = parse_id(&id)?;

    if let Some(name) = &body.name {
        validate::name(name, "name")?;
    }
    validate::url(body.image_url.as_deref(), "image_url")?;

    let changes = ArtistUpdate {
        name: body.name.map(|n| n.trim().to_string()),
        image_url: body.image_url,
    };

    let changed = artists::update(&state.db, guid, &changes).await?;
    if !changed {
        return Err(ApiError::NotFound(format!("artist not found: {id}")));
    }

    let updated = artists::get(&state.db, guid)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("artist not found: {id}")))?;

    Ok(Json(updated))
}

/// DELETE /api/artists/:id
///
/// Refused with 409 while albums or songs still reference the artist.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let guid = parse_id(&id)?;

    let deleted = artists::delete(&state.db, guid)
        .await
        .map_err(|e| ApiError::from_delete_error(e, "artist still has albums or songs"))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("artist not found: {id}")));
    }

    info!("Deleted artist {}", id);
    Ok(StatusCode::NO_CONTENT)
}
