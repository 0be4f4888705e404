use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::ContactMessage,
    routes::AppState,
    services::mailer::deliver_contact_message,
};

/// Handler for the contact form
pub async fn send(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    Json(message): Json<ContactMessage>,
) -> AppResult<Json<Value>> {
    let message = deliver_contact_message(state.mailer.as_ref(), message).await?;

    tracing::info!(request_id = %request_id, sender = %message.email, "Contact message sent");

    Ok(Json(json!({ "message": "Email sent successfully" })))
}
