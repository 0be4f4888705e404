use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    cached,
    db::{CacheKey, Store},
    error::{AppError, AppResult},
    middleware::{CurrentUser, RequestId},
    models::{NewPlace, Place, PlaceCategory},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct PlacesQuery {
    #[serde(default)]
    pub category: Option<PlaceCategory>,
}

/// Handler for listing map places
pub async fn list(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    Query(query): Query<PlacesQuery>,
) -> AppResult<Json<Vec<Place>>> {
    let places = state.store.list_places(query.category).await?;

    tracing::info!(
        request_id = %request_id,
        category = ?query.category,
        place_count = places.len(),
        "Listed places"
    );

    Ok(Json(places))
}

/// Handler for a single place; served from the cache when one is configured
pub async fn get(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    Path(id): Path<i32>,
) -> AppResult<Json<Place>> {
    let place = match &state.cache {
        Some(cache) => {
            let place: AppResult<Place> = cached!(
                cache,
                CacheKey::Place(id),
                state.place_cache_ttl,
                fetch_place(state.store.as_ref(), id)
            );
            place?
        }
        None => fetch_place(state.store.as_ref(), id).await?,
    };

    tracing::info!(request_id = %request_id, place_id = id, "Fetched place");

    Ok(Json(place))
}

async fn fetch_place(store: &dyn Store, id: i32) -> AppResult<Place> {
    store
        .get_place(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Place {} not found", id)))
}

/// Handler for the "add place" form
pub async fn create(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    user: CurrentUser,
    Json(new_place): Json<NewPlace>,
) -> AppResult<(StatusCode, Json<Place>)> {
    new_place.validate()?;
    let place = state.store.create_place(new_place).await?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user.user_id,
        place_id = place.id,
        category = %place.category,
        "Created place"
    );

    Ok((StatusCode::CREATED, Json(place)))
}
