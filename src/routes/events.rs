use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::{CurrentUser, RequestId},
    models::{Event, NewEvent},
    routes::AppState,
    services::{
        group_by_day, schedule::UpcomingMonth, schedule::UPCOMING_MONTHS_LIMIT, upcoming_months,
        Agenda, EventFilter,
    },
};

/// Handler for the flat event list, with optional search and category filter
pub async fn list(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    Query(filter): Query<EventFilter>,
) -> AppResult<Json<Vec<Event>>> {
    let events = filter.apply(state.store.list_events().await?);

    tracing::info!(request_id = %request_id, event_count = events.len(), "Listed events");

    Ok(Json(events))
}

/// Handler for the events page agenda: filtered events grouped by day
pub async fn agenda(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    Query(filter): Query<EventFilter>,
) -> AppResult<Json<Agenda>> {
    let events = filter.apply(state.store.list_events().await?);
    let event_count = events.len();
    let agenda = group_by_day(events);

    tracing::info!(
        request_id = %request_id,
        event_count,
        day_count = agenda.len(),
        "Built event agenda"
    );

    Ok(Json(agenda))
}

/// Handler for the months that still have events
pub async fn months(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
) -> AppResult<Json<Vec<UpcomingMonth>>> {
    let events = state.store.list_events().await?;
    let today = Utc::now().date_naive();
    let months = upcoming_months(&events, today, UPCOMING_MONTHS_LIMIT);

    tracing::info!(request_id = %request_id, month_count = months.len(), "Listed upcoming months");

    Ok(Json(months))
}

/// Handler for event creation
pub async fn create(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    user: CurrentUser,
    Json(new_event): Json<NewEvent>,
) -> AppResult<(StatusCode, Json<Event>)> {
    let author = user.author()?;
    new_event.validate()?;

    let event = state.store.create_event(new_event, author).await?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user.user_id,
        event_id = event.id,
        date = %event.date,
        "Created event"
    );

    Ok((StatusCode::CREATED, Json(event)))
}
