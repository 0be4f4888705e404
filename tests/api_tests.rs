use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request, StatusCode},
};
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

use craiova_guide::{
    db::MemoryStore,
    error::{AppError, AppResult},
    models::ContactMessage,
    routes::{create_router, AppState},
    services::{suggestions::SuggestionPolicy, ContactMailer},
};

const USER_ID: HeaderName = HeaderName::from_static("x-user-id");
const USER_EMAIL: HeaderName = HeaderName::from_static("x-user-email");

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<ContactMessage>>,
    fail: bool,
}

#[async_trait::async_trait]
impl ContactMailer for RecordingMailer {
    async fn send(&self, message: &ContactMessage) -> AppResult<()> {
        if self.fail {
            return Err(AppError::ExternalApi("relay unavailable".to_string()));
        }
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}

fn server_with(mailer: Arc<RecordingMailer>, policy: SuggestionPolicy) -> TestServer {
    let state = AppState::new(Arc::new(MemoryStore::new()), mailer).with_suggestion_policy(policy);
    TestServer::new(create_router(Arc::new(state))).unwrap()
}

fn create_test_server() -> TestServer {
    server_with(Arc::new(RecordingMailer::default()), SuggestionPolicy::default())
}

fn user(id: &'static str) -> HeaderValue {
    HeaderValue::from_static(id)
}

async fn create_place(server: &TestServer, name: &str, category: &str) -> i64 {
    let response = server
        .post("/api/places")
        .add_header(USER_ID, user("user_admin"))
        .json(&json!({
            "name": name,
            "category": category,
            "description": "Un loc din Craiova",
            "mainPhotoUrl": "https://img.example/place.jpg",
            "gallery": [],
            "lat": 44.3302,
            "lng": 23.7949
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let place: Value = response.json();
    place["id"].as_i64().unwrap()
}

async fn create_event(server: &TestServer, title: &str, date: &str, time: &str) -> i64 {
    let response = server
        .post("/api/events")
        .add_header(USER_ID, user("user_org"))
        .add_header(USER_EMAIL, HeaderValue::from_static("org@example.com"))
        .json(&json!({
            "title": title,
            "description": "Eveniment in centrul Craiovei",
            "location": "Piata Mihai Viteazul",
            "date": date,
            "time": time,
            "maxParticipants": 200,
            "photo": "https://img.example/event.jpg",
            "externalLink": "https://tickets.example/event"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let event: Value = response.json();
    event["id"].as_i64().unwrap()
}

async fn like(server: &TestServer, user_id: &'static str, place_id: i64) {
    server
        .post("/api/preferences")
        .add_header(USER_ID, user(user_id))
        .json(&json!({ "placeId": place_id, "interactionType": "like" }))
        .await
        .assert_status_ok();
}

fn ids(values: &[Value]) -> Vec<i64> {
    values.iter().map(|v| v["id"].as_i64().unwrap()).collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let id = "6f1c7d7e-8d0b-4a53-9a4e-0e3f8f2d2a10";
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("6f1c7d7e-8d0b-4a53-9a4e-0e3f8f2d2a10"),
        )
        .await;
    assert_eq!(response.headers().get("x-request-id").unwrap(), id);
}

#[tokio::test]
async fn test_create_and_get_place() {
    let server = create_test_server();
    let id = create_place(&server, "Muzeul de Arta", "museum").await;

    let response = server.get(&format!("/api/places/{}", id)).await;
    response.assert_status_ok();
    let place: Value = response.json();
    assert_eq!(place["name"], "Muzeul de Arta");
    assert_eq!(place["category"], "museum");
    assert_eq!(place["mainPhoto"], "https://img.example/place.jpg");

    server.get("/api/places/9999").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_place_requires_user_and_valid_category() {
    let server = create_test_server();

    server
        .post("/api/places")
        .json(&json!({
            "name": "Anonim",
            "category": "park",
            "mainPhoto": "p.jpg",
            "lat": 44.3,
            "lng": 23.8
        }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .post("/api/places")
        .add_header(USER_ID, user("user_admin"))
        .json(&json!({
            "name": "Cazino",
            "category": "casino",
            "mainPhoto": "p.jpg",
            "lat": 44.3,
            "lng": 23.8
        }))
        .await;
    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn test_create_place_rejects_photo_url_longer_than_column() {
    let server = create_test_server();
    let response = server
        .post("/api/places")
        .add_header(USER_ID, user("user_admin"))
        .json(&json!({
            "name": "Gradina Botanica",
            "category": "park",
            "mainPhoto": format!("https://img.example/{}", "x".repeat(300)),
            "lat": 44.31,
            "lng": 23.80
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_places_by_category() {
    let server = create_test_server();
    create_place(&server, "Casa Oltenia", "restaurant").await;
    let park = create_place(&server, "Parcul Romanescu", "park").await;

    let response = server.get("/api/places").add_query_param("category", "park").await;
    response.assert_status_ok();
    let places: Vec<Value> = response.json();
    assert_eq!(ids(&places), vec![park]);
}

#[tokio::test]
async fn test_suggestions_require_user() {
    let server = create_test_server();
    server.get("/api/suggestions").await.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_suggestions_follow_liked_category() {
    let server = create_test_server();
    let museum_a = create_place(&server, "Muzeul Olteniei", "museum").await;
    create_place(&server, "Casa Mare", "restaurant").await;
    let museum_b = create_place(&server, "Muzeul de Arta", "museum").await;
    create_place(&server, "Bistro Craiova", "restaurant").await;
    let museum_c = create_place(&server, "Casa Baniei", "museum").await;

    like(&server, "user_ana", museum_b).await;

    let response = server
        .get("/api/suggestions")
        .add_header(USER_ID, user("user_ana"))
        .await;
    response.assert_status_ok();
    let places: Vec<Value> = response.json();

    assert!(places.iter().all(|p| p["category"] == "museum"));
    assert_eq!(ids(&places), vec![museum_a, museum_c]);
}

#[tokio::test]
async fn test_suggestions_can_keep_liked_places() {
    let server = server_with(
        Arc::new(RecordingMailer::default()),
        SuggestionPolicy::first_returned_unfiltered(),
    );
    let museum_a = create_place(&server, "Muzeul Olteniei", "museum").await;
    let museum_b = create_place(&server, "Muzeul de Arta", "museum").await;
    create_place(&server, "Casa Mare", "restaurant").await;

    like(&server, "user_ana", museum_b).await;

    let places: Vec<Value> = server
        .get("/api/suggestions")
        .add_header(USER_ID, user("user_ana"))
        .await
        .json();
    assert_eq!(ids(&places), vec![museum_a, museum_b]);
}

#[tokio::test]
async fn test_new_user_gets_restaurants() {
    let server = create_test_server();
    create_place(&server, "Muzeul Olteniei", "museum").await;
    let restaurant = create_place(&server, "Casa Mare", "restaurant").await;

    let places: Vec<Value> = server
        .get("/api/suggestions")
        .add_header(USER_ID, user("user_new"))
        .await
        .json();
    assert_eq!(ids(&places), vec![restaurant]);
}

#[tokio::test]
async fn test_suggestions_are_capped_at_five() {
    let server = create_test_server();
    for i in 0..8 {
        create_place(&server, &format!("Cafenea {}", i), "cafe").await;
    }
    let first: Vec<Value> = server.get("/api/places").await.json();
    like(&server, "user_ana", first[0]["id"].as_i64().unwrap()).await;

    let places: Vec<Value> = server
        .get("/api/suggestions")
        .add_header(USER_ID, user("user_ana"))
        .await
        .json();
    assert_eq!(places.len(), 5);
}

#[tokio::test]
async fn test_unlike_removes_like() {
    let server = create_test_server();
    let park = create_place(&server, "Parcul Romanescu", "park").await;
    like(&server, "user_ana", park).await;

    let response = server
        .post("/api/preferences")
        .add_header(USER_ID, user("user_ana"))
        .json(&json!({ "placeId": park, "interactionType": "unlike" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["removed"], 1);

    let prefs: Vec<Value> = server
        .get("/api/preferences")
        .add_header(USER_ID, user("user_ana"))
        .await
        .json();
    assert!(prefs.is_empty());
}

#[tokio::test]
async fn test_preference_needs_a_target() {
    let server = create_test_server();
    server
        .post("/api/preferences")
        .add_header(USER_ID, user("user_ana"))
        .json(&json!({ "interactionType": "like" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_agenda_groups_events_by_day() {
    let server = create_test_server();
    let evening = create_event(&server, "Concert simfonic", "2024-05-15", "18:00").await;
    let morning = create_event(&server, "Targ de carte", "2024-05-15", "09:30").await;
    let noon = create_event(&server, "Festivalul Shakespeare", "2024-05-16", "12:00").await;

    let response = server.get("/api/events/agenda").await;
    response.assert_status_ok();
    let agenda: serde_json::Map<String, Value> = response.json();

    let days: Vec<&String> = agenda.keys().collect();
    assert_eq!(days, vec!["2024-05-15", "2024-05-16"]);
    assert_eq!(ids(agenda["2024-05-15"].as_array().unwrap()), vec![morning, evening]);
    assert_eq!(ids(agenda["2024-05-16"].as_array().unwrap()), vec![noon]);
}

#[tokio::test]
async fn test_agenda_category_filter() {
    let server = create_test_server();
    let concert = create_event(&server, "Concert rock", "2024-06-01", "20:00").await;
    create_event(&server, "Teatru de vara", "2024-06-01", "19:00").await;

    let agenda: serde_json::Map<String, Value> = server
        .get("/api/events/agenda")
        .add_query_param("category", "concert")
        .await
        .json();
    assert_eq!(ids(agenda["2024-06-01"].as_array().unwrap()), vec![concert]);
}

#[tokio::test]
async fn test_event_timestamp_dates_use_utc_day() {
    let server = create_test_server();
    create_event(&server, "Film in aer liber", "2024-05-15T00:00:00+03:00", "21:00").await;

    let events: Vec<Value> = server.get("/api/events").await.json();
    assert_eq!(events[0]["date"], "2024-05-14");
}

#[tokio::test]
async fn test_create_event_validation() {
    let server = create_test_server();

    let response = server
        .post("/api/events")
        .add_header(USER_ID, user("user_org"))
        .add_header(USER_EMAIL, HeaderValue::from_static("org@example.com"))
        .json(&json!({
            "title": "Concert",
            "description": "Eveniment in centrul Craiovei",
            "location": "Piata",
            "date": "2024-05-15",
            "time": "24:30",
            "maxParticipants": 10,
            "photo": "p.jpg",
            "externalLink": "https://tickets.example"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/events")
        .add_header(USER_ID, user("user_org"))
        .json(&json!({
            "title": "Concert",
            "description": "Eveniment in centrul Craiovei",
            "location": "Piata",
            "date": "2024-05-15",
            "time": "20:30",
            "maxParticipants": 10,
            "photo": "p.jpg",
            "externalLink": "https://tickets.example"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "User email not found");
}

#[tokio::test]
async fn test_reviews_flow() {
    let server = create_test_server();
    let place = create_place(&server, "Casa Mare", "restaurant").await;

    for rating in [5, 3] {
        server
            .post("/api/reviews")
            .add_header(USER_ID, user("user_ana"))
            .add_header(USER_EMAIL, HeaderValue::from_static("ana@example.com"))
            .json(&json!({ "placeId": place, "rating": rating, "comment": "Foarte bun" }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let body: Value = server
        .get(&format!("/api/places/{}/reviews", place))
        .await
        .json();
    assert_eq!(body["summary"]["count"], 2);
    assert_eq!(body["summary"]["averageRating"], 4.0);
    assert_eq!(body["reviews"][0]["rating"], 3);
}

#[tokio::test]
async fn test_review_for_missing_place() {
    let server = create_test_server();
    server
        .post("/api/reviews")
        .add_header(USER_ID, user("user_ana"))
        .add_header(USER_EMAIL, HeaderValue::from_static("ana@example.com"))
        .json(&json!({ "placeId": 77, "rating": 4 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_contact_message_is_delivered() {
    let mailer = Arc::new(RecordingMailer::default());
    let server = server_with(mailer.clone(), SuggestionPolicy::default());

    let response = server
        .post("/api/contact")
        .json(&json!({ "name": "Ana", "email": "ana@example.com", "message": "Salut!" }))
        .await;
    response.assert_status_ok();

    let sent = mailer.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].name, "Ana");
}

#[tokio::test]
async fn test_contact_errors() {
    let server = create_test_server();
    server
        .post("/api/contact")
        .json(&json!({ "name": "Ana", "email": "nope", "message": "Salut!" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let failing = Arc::new(RecordingMailer {
        sent: Mutex::new(Vec::new()),
        fail: true,
    });
    let server = server_with(failing, SuggestionPolicy::default());
    server
        .post("/api/contact")
        .json(&json!({ "name": "Ana", "email": "ana@example.com", "message": "Salut!" }))
        .await
        .assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_router_oneshot_tags_responses_with_request_id() {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(RecordingMailer::default()),
    );
    let app = create_router(Arc::new(state));

    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let response = app
        .oneshot(
            Request::get("/api/suggestions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("x-request-id"));
}
