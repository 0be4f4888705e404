use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::{CurrentUser, RequestId},
    models::Place,
    routes::AppState,
};

/// Handler for personalized place suggestions
pub async fn suggest(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    user: CurrentUser,
) -> AppResult<Json<Vec<Place>>> {
    let interactions = state.store.list_interactions(&user.user_id).await?;
    let places = state.store.list_places(None).await?;

    let suggestions = state
        .suggestions
        .suggest(&user.user_id, &interactions, &places);

    tracing::info!(
        request_id = %request_id,
        user_id = %user.user_id,
        category = %suggestions.category,
        suggestion_count = suggestions.places.len(),
        "Generated suggestions"
    );

    Ok(Json(suggestions.places))
}
