use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};

use crate::{
    db::store::{Author, Store},
    error::{AppError, AppResult},
    models::{
        Event, Interaction, InteractionKind, InteractionTarget, NewEvent, NewInteraction,
        NewPlace, NewReview, Place, PlaceCategory, Review,
    },
};

/// Postgres error code for a foreign key violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Creates a PostgreSQL connection pool and applies pending migrations
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

#[derive(Debug, FromRow)]
struct PlaceRow {
    id: i32,
    name: String,
    category: String,
    description: Option<String>,
    main_photo: String,
    gallery: Option<Vec<String>>,
    lat: f64,
    lng: f64,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<PlaceRow> for Place {
    type Error = AppError;

    fn try_from(row: PlaceRow) -> Result<Self, Self::Error> {
        Ok(Place {
            id: row.id,
            name: row.name,
            category: row.category.parse().map_err(|_| {
                AppError::Internal(format!("Place {} has unknown category {}", row.id, row.category))
            })?,
            description: row.description,
            main_photo: row.main_photo,
            gallery: row.gallery.unwrap_or_default(),
            lat: row.lat,
            lng: row.lng,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct EventRow {
    id: i32,
    title: String,
    description: String,
    location: String,
    date: NaiveDate,
    time: String,
    max_participants: i32,
    photo: String,
    external_link: String,
    user_id: String,
    user_email: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            title: row.title,
            description: row.description,
            location: row.location,
            date: row.date,
            time: row.time,
            max_participants: row.max_participants,
            photo: row.photo,
            external_link: row.external_link,
            user_id: row.user_id,
            user_email: row.user_email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct InteractionRow {
    id: i32,
    user_id: String,
    place_id: Option<i32>,
    event_id: Option<i32>,
    interaction_type: String,
    rating: Option<i32>,
    created_at: DateTime<Utc>,
}

impl TryFrom<InteractionRow> for Interaction {
    type Error = AppError;

    fn try_from(row: InteractionRow) -> Result<Self, Self::Error> {
        let kind = InteractionKind::parse(&row.interaction_type).ok_or_else(|| {
            AppError::Internal(format!(
                "Interaction {} has unknown type {}",
                row.id, row.interaction_type
            ))
        })?;
        let target = InteractionTarget::from_parts(row.place_id, row.event_id)
            .map_err(|e| AppError::Internal(format!("Interaction {}: {}", row.id, e)))?;

        Ok(Interaction {
            id: row.id,
            user_id: row.user_id,
            target,
            kind,
            rating: row.rating,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ReviewRow {
    id: i32,
    place_id: i32,
    user_id: String,
    user_email: String,
    rating: i32,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            place_id: row.place_id,
            user_id: row.user_id,
            user_email: row.user_email,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

/// Turns a foreign key violation into a 404 for the referenced row
fn missing_reference(err: sqlx::Error, what: impl FnOnce() -> String) -> AppError {
    let is_fk_violation = err
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == FOREIGN_KEY_VIOLATION);

    if is_fk_violation {
        AppError::NotFound(what())
    } else {
        AppError::Database(err)
    }
}

const PLACE_COLUMNS: &str =
    "id, name, category, description, main_photo, gallery, lat, lng, created_at, updated_at";
const EVENT_COLUMNS: &str = "id, title, description, location, date, time, max_participants, \
     photo, external_link, user_id, user_email, created_at, updated_at";
const INTERACTION_COLUMNS: &str =
    "id, user_id, place_id, event_id, interaction_type, rating, created_at";
const REVIEW_COLUMNS: &str = "id, place_id, user_id, user_email, rating, comment, created_at";

/// Store backed by PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn list_places(&self, category: Option<PlaceCategory>) -> AppResult<Vec<Place>> {
        let rows: Vec<PlaceRow> = match category {
            Some(category) => {
                sqlx::query_as(&format!(
                    "SELECT {} FROM places WHERE category = $1 ORDER BY id",
                    PLACE_COLUMNS
                ))
                .bind(category.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!("SELECT {} FROM places ORDER BY id", PLACE_COLUMNS))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.into_iter().map(Place::try_from).collect()
    }

    async fn get_place(&self, id: i32) -> AppResult<Option<Place>> {
        let row: Option<PlaceRow> =
            sqlx::query_as(&format!("SELECT {} FROM places WHERE id = $1", PLACE_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Place::try_from).transpose()
    }

    async fn create_place(&self, place: NewPlace) -> AppResult<Place> {
        let row: PlaceRow = sqlx::query_as(&format!(
            "INSERT INTO places (name, category, description, main_photo, gallery, lat, lng) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            PLACE_COLUMNS
        ))
        .bind(place.name.trim())
        .bind(place.category.as_str())
        .bind(&place.description)
        .bind(&place.main_photo)
        .bind(&place.gallery)
        .bind(place.lat)
        .bind(place.lng)
        .fetch_one(&self.pool)
        .await?;

        Place::try_from(row)
    }

    async fn list_events(&self) -> AppResult<Vec<Event>> {
        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            "SELECT {} FROM events ORDER BY date, id",
            EVENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn create_event(&self, event: NewEvent, author: Author) -> AppResult<Event> {
        let row: EventRow = sqlx::query_as(&format!(
            "INSERT INTO events (title, description, location, date, time, max_participants, \
             photo, external_link, user_id, user_email) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {}",
            EVENT_COLUMNS
        ))
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.date)
        .bind(&event.time)
        .bind(event.max_participants)
        .bind(&event.photo)
        .bind(&event.external_link)
        .bind(&author.user_id)
        .bind(&author.user_email)
        .fetch_one(&self.pool)
        .await?;

        Ok(Event::from(row))
    }

    async fn list_interactions(&self, user_id: &str) -> AppResult<Vec<Interaction>> {
        let rows: Vec<InteractionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM user_preferences WHERE user_id = $1 ORDER BY id",
            INTERACTION_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Interaction::try_from).collect()
    }

    async fn record_interaction(
        &self,
        user_id: &str,
        interaction: NewInteraction,
    ) -> AppResult<Interaction> {
        let target = interaction.target;
        let row: InteractionRow = sqlx::query_as(&format!(
            "INSERT INTO user_preferences (user_id, place_id, event_id, interaction_type, rating) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            INTERACTION_COLUMNS
        ))
        .bind(user_id)
        .bind(target.place_id())
        .bind(target.event_id())
        .bind(interaction.kind.as_str())
        .bind(interaction.rating)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            missing_reference(e, || format!("Interaction target {:?} does not exist", target))
        })?;

        Interaction::try_from(row)
    }

    async fn remove_likes(&self, user_id: &str, target: InteractionTarget) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM user_preferences \
             WHERE user_id = $1 AND interaction_type = 'like' \
             AND place_id IS NOT DISTINCT FROM $2 AND event_id IS NOT DISTINCT FROM $3",
        )
        .bind(user_id)
        .bind(target.place_id())
        .bind(target.event_id())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn list_reviews(&self, place_id: i32) -> AppResult<Vec<Review>> {
        let rows: Vec<ReviewRow> = sqlx::query_as(&format!(
            "SELECT {} FROM reviews WHERE place_id = $1 ORDER BY created_at DESC, id DESC",
            REVIEW_COLUMNS
        ))
        .bind(place_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn create_review(&self, review: NewReview, author: Author) -> AppResult<Review> {
        let place_id = review.place_id;
        let row: ReviewRow = sqlx::query_as(&format!(
            "INSERT INTO reviews (place_id, user_id, user_email, rating, comment) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            REVIEW_COLUMNS
        ))
        .bind(place_id)
        .bind(&author.user_id)
        .bind(&author.user_email)
        .bind(review.rating)
        .bind(&review.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| missing_reference(e, || format!("Place {} not found", place_id)))?;

        Ok(Review::from(row))
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
