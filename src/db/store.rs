use crate::{
    error::AppResult,
    models::{
        Event, Interaction, InteractionTarget, NewEvent, NewInteraction, NewPlace, NewReview,
        Place, PlaceCategory, Review,
    },
};

/// Identity of the author of a submitted row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub user_id: String,
    pub user_email: String,
}

/// Persistence boundary for places, events, interactions and reviews.
///
/// Read methods return rows in a stable order: places and interactions by id,
/// events by date then id, reviews newest first.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    async fn list_places(&self, category: Option<PlaceCategory>) -> AppResult<Vec<Place>>;

    async fn get_place(&self, id: i32) -> AppResult<Option<Place>>;

    async fn create_place(&self, place: NewPlace) -> AppResult<Place>;

    async fn list_events(&self) -> AppResult<Vec<Event>>;

    async fn create_event(&self, event: NewEvent, author: Author) -> AppResult<Event>;

    /// All interactions of one user
    async fn list_interactions(&self, user_id: &str) -> AppResult<Vec<Interaction>>;

    async fn record_interaction(
        &self,
        user_id: &str,
        interaction: NewInteraction,
    ) -> AppResult<Interaction>;

    /// Deletes the user's likes on `target`, returning how many were removed
    async fn remove_likes(&self, user_id: &str, target: InteractionTarget) -> AppResult<u64>;

    async fn list_reviews(&self, place_id: i32) -> AppResult<Vec<Review>>;

    async fn create_review(&self, review: NewReview, author: Author) -> AppResult<Review>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}
