use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::{CurrentUser, RequestId},
    models::{Interaction, InteractionAction, InteractionRequest},
    routes::AppState,
};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PreferenceResponse {
    Recorded(Interaction),
    Unliked { success: bool, removed: u64 },
}

/// Handler listing the current user's interactions
pub async fn list(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    user: CurrentUser,
) -> AppResult<Json<Vec<Interaction>>> {
    let interactions = state.store.list_interactions(&user.user_id).await?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user.user_id,
        interaction_count = interactions.len(),
        "Listed preferences"
    );

    Ok(Json(interactions))
}

/// Handler recording a like/view/review, or removing likes on `unlike`
pub async fn record(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    user: CurrentUser,
    Json(request): Json<InteractionRequest>,
) -> AppResult<Json<PreferenceResponse>> {
    let response = match request.into_action()? {
        InteractionAction::Record(new) => {
            let interaction = state.store.record_interaction(&user.user_id, new).await?;
            tracing::info!(
                request_id = %request_id,
                user_id = %user.user_id,
                kind = interaction.kind.as_str(),
                target = ?interaction.target,
                "Recorded interaction"
            );
            PreferenceResponse::Recorded(interaction)
        }
        InteractionAction::Unlike(target) => {
            let removed = state.store.remove_likes(&user.user_id, target).await?;
            tracing::info!(
                request_id = %request_id,
                user_id = %user.user_id,
                target = ?target,
                removed,
                "Removed likes"
            );
            PreferenceResponse::Unliked {
                success: true,
                removed,
            }
        }
    };

    Ok(Json(response))
}
