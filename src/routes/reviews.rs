use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::{CurrentUser, RequestId},
    models::{NewReview, Review, ReviewSummary},
    routes::AppState,
};

#[derive(Debug, Serialize)]
pub struct PlaceReviews {
    pub summary: ReviewSummary,
    pub reviews: Vec<Review>,
}

/// Handler for a place's reviews, newest first
pub async fn list_for_place(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    Path(place_id): Path<i32>,
) -> AppResult<Json<PlaceReviews>> {
    if state.store.get_place(place_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Place {} not found", place_id)));
    }

    let reviews = state.store.list_reviews(place_id).await?;
    let summary = ReviewSummary::from_reviews(&reviews);

    tracing::info!(
        request_id = %request_id,
        place_id,
        review_count = summary.count,
        "Listed reviews"
    );

    Ok(Json(PlaceReviews { summary, reviews }))
}

/// Handler for review submission
pub async fn create(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    user: CurrentUser,
    Json(new_review): Json<NewReview>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let author = user.author()?;
    new_review.validate()?;

    let review = state.store.create_review(new_review, author).await?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user.user_id,
        place_id = review.place_id,
        rating = review.rating,
        "Review submitted"
    );

    Ok((StatusCode::CREATED, Json(review)))
}
