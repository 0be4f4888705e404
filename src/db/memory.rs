use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    db::store::{Author, Store},
    error::{AppError, AppResult},
    models::{
        Event, Interaction, InteractionKind, InteractionTarget, NewEvent, NewInteraction,
        NewPlace, NewReview, Place, PlaceCategory, Review,
    },
};

#[derive(Default)]
struct Tables {
    places: Vec<Place>,
    events: Vec<Event>,
    interactions: Vec<Interaction>,
    reviews: Vec<Review>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Process-local store, used when no database is configured and in tests
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn list_places(&self, category: Option<PlaceCategory>) -> AppResult<Vec<Place>> {
        let tables = self.tables.read().await;
        Ok(tables
            .places
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .cloned()
            .collect())
    }

    async fn get_place(&self, id: i32) -> AppResult<Option<Place>> {
        let tables = self.tables.read().await;
        Ok(tables.places.iter().find(|p| p.id == id).cloned())
    }

    async fn create_place(&self, place: NewPlace) -> AppResult<Place> {
        let mut tables = self.tables.write().await;
        let place = Place {
            id: tables.next_id(),
            name: place.name.trim().to_string(),
            category: place.category,
            description: place.description,
            main_photo: place.main_photo,
            gallery: place.gallery,
            lat: place.lat,
            lng: place.lng,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.places.push(place.clone());
        Ok(place)
    }

    async fn list_events(&self) -> AppResult<Vec<Event>> {
        let tables = self.tables.read().await;
        let mut events = tables.events.clone();
        events.sort_by_key(|e| (e.date, e.id));
        Ok(events)
    }

    async fn create_event(&self, event: NewEvent, author: Author) -> AppResult<Event> {
        let mut tables = self.tables.write().await;
        let event = Event {
            id: tables.next_id(),
            title: event.title,
            description: event.description,
            location: event.location,
            date: event.date,
            time: event.time,
            max_participants: event.max_participants,
            photo: event.photo,
            external_link: event.external_link,
            user_id: author.user_id,
            user_email: author.user_email,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.events.push(event.clone());
        Ok(event)
    }

    async fn list_interactions(&self, user_id: &str) -> AppResult<Vec<Interaction>> {
        let tables = self.tables.read().await;
        Ok(tables
            .interactions
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn record_interaction(
        &self,
        user_id: &str,
        interaction: NewInteraction,
    ) -> AppResult<Interaction> {
        let mut tables = self.tables.write().await;

        let exists = match interaction.target {
            InteractionTarget::PlaceId(id) => tables.places.iter().any(|p| p.id == id),
            InteractionTarget::EventId(id) => tables.events.iter().any(|e| e.id == id),
        };
        if !exists {
            return Err(AppError::NotFound(format!(
                "Interaction target {:?} does not exist",
                interaction.target
            )));
        }

        let interaction = Interaction {
            id: tables.next_id(),
            user_id: user_id.to_string(),
            target: interaction.target,
            kind: interaction.kind,
            rating: interaction.rating,
            created_at: Utc::now(),
        };
        tables.interactions.push(interaction.clone());
        Ok(interaction)
    }

    async fn remove_likes(&self, user_id: &str, target: InteractionTarget) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.interactions.len();
        tables.interactions.retain(|i| {
            !(i.user_id == user_id && i.kind == InteractionKind::Like && i.target == target)
        });
        Ok((before - tables.interactions.len()) as u64)
    }

    async fn list_reviews(&self, place_id: i32) -> AppResult<Vec<Review>> {
        let tables = self.tables.read().await;
        let mut reviews: Vec<Review> = tables
            .reviews
            .iter()
            .filter(|r| r.place_id == place_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(reviews)
    }

    async fn create_review(&self, review: NewReview, author: Author) -> AppResult<Review> {
        let mut tables = self.tables.write().await;
        if !tables.places.iter().any(|p| p.id == review.place_id) {
            return Err(AppError::NotFound(format!("Place {} not found", review.place_id)));
        }
        let review = Review {
            id: tables.next_id(),
            place_id: review.place_id,
            user_id: author.user_id,
            user_email: author.user_email,
            rating: review.rating,
            comment: review.comment,
            created_at: Utc::now(),
        };
        tables.reviews.push(review.clone());
        Ok(review)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
