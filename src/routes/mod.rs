use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::{Cache, Store},
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{ContactMailer, SuggestionEngine, SuggestionPolicy},
};

pub mod contact;
pub mod events;
pub mod places;
pub mod preferences;
pub mod reviews;
pub mod suggestions;

/// Default lifetime of a cached place, in seconds
pub const DEFAULT_PLACE_CACHE_TTL: u64 = 3600;

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub cache: Option<Cache>,
    pub mailer: Arc<dyn ContactMailer>,
    pub suggestions: SuggestionEngine,
    pub place_cache_ttl: u64,
}

impl AppState {
    /// State without a cache, using the default suggestion policy
    pub fn new(store: Arc<dyn Store>, mailer: Arc<dyn ContactMailer>) -> Self {
        Self {
            store,
            cache: None,
            mailer,
            suggestions: SuggestionEngine::default(),
            place_cache_ttl: DEFAULT_PLACE_CACHE_TTL,
        }
    }

    pub fn with_cache(mut self, cache: Cache, ttl: u64) -> Self {
        self.cache = Some(cache);
        self.place_cache_ttl = ttl;
        self
    }

    pub fn with_suggestion_policy(mut self, policy: SuggestionPolicy) -> Self {
        self.suggestions = SuggestionEngine::new(policy);
        self
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
}

/// API routes under /api
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/places", get(places::list).post(places::create))
        .route("/places/:id", get(places::get))
        .route("/places/:id/reviews", get(reviews::list_for_place))
        .route("/reviews", post(reviews::create))
        .route("/events", get(events::list).post(events::create))
        .route("/events/agenda", get(events::agenda))
        .route("/events/months", get(events::months))
        .route("/preferences", get(preferences::list).post(preferences::record))
        .route("/suggestions", get(suggestions::suggest))
        .route("/contact", post(contact::send))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
