//! ApiClient Integration Tests
//!
//! Runs the reqwest client against an in-process axum backend bound to a
//! random local port.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Form, Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use railbook_client::{ApiClient, BookingApi, LocalStorage, MemoryStorage};
use railbook_core::models::{Credentials, NewBooking, NewLocation, TrainQuery};

const TOKEN: &str = "tok-123";

#[derive(Default)]
struct Recorded {
    search_queries: Vec<Option<String>>,
    deleted_locations: Vec<i64>,
}

type Shared = Arc<Mutex<Recorded>>;

fn error(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn authorised(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v == format!("Bearer {}", TOKEN))
}

fn train_json(id: i64, source_id: i64, destination_id: i64, available: i64) -> Value {
    json!({
        "id": id,
        "train_number": format!("1200{}", id),
        "train_name": "Express",
        "source_id": source_id,
        "destination_id": destination_id,
        "departure_time": "06:00:00",
        "arrival_time": "09:30:00",
        "total_seats": 50,
        "available_seats": available,
        "fare": 450,
        "created_at": "2025-01-01T00:00:00+00:00"
    })
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(Form(form): Form<LoginForm>) -> Response {
    if form.username == "asha" && form.password == "secret" {
        Json(json!({ "access_token": TOKEN, "token_type": "bearer" })).into_response()
    } else {
        error(StatusCode::UNAUTHORIZED, "Incorrect username or password")
    }
}

async fn me(headers: HeaderMap) -> Response {
    if !authorised(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Could not validate credentials");
    }
    Json(json!({
        "id": 1, "username": "asha", "email": "asha@example.com",
        "full_name": "Asha Rao", "is_active": true, "is_admin": false
    }))
    .into_response()
}

async fn create_location(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorised(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    if body["code"] == "MAS" {
        return error(StatusCode::BAD_REQUEST, "Location code already exists");
    }
    let mut created = body.clone();
    created["id"] = json!(10);
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn delete_location(State(state): State<Shared>, Path(id): Path<i64>) -> StatusCode {
    state.lock().unwrap().deleted_locations.push(id);
    StatusCode::NO_CONTENT
}

#[derive(Deserialize)]
struct SearchParams {
    source_id: Option<i64>,
    destination_id: Option<i64>,
}

async fn search(
    State(state): State<Shared>,
    RawQuery(raw): RawQuery,
    Query(params): Query<SearchParams>,
) -> Json<Value> {
    state.lock().unwrap().search_queries.push(raw);
    let all = vec![
        train_json(1, 1, 2, 10),
        train_json(2, 1, 3, 10),
        train_json(3, 4, 2, 0),
    ];
    let matching: Vec<Value> = all
        .into_iter()
        .filter(|t| params.source_id.map_or(true, |id| t["source_id"] == id))
        .filter(|t| {
            params
                .destination_id
                .map_or(true, |id| t["destination_id"] == id)
        })
        .collect();
    Json(Value::Array(matching))
}

async fn create_booking(Json(body): Json<Value>) -> Response {
    if body["train_id"] == 3 {
        return error(StatusCode::BAD_REQUEST, "No seats available");
    }
    let mut created = body.clone();
    created["id"] = json!(77);
    created["booking_reference"] = json!("TKT9F8E7D6C");
    created["user_id"] = json!(1);
    created["seat_number"] = json!("S41");
    created["total_fare"] = json!(450);
    created["status"] = json!("confirmed");
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn cancel_booking(Path(id): Path<i64>) -> Response {
    if id == 404 {
        return error(StatusCode::NOT_FOUND, "Booking not found");
    }
    Json(json!({
        "message": "Booking cancelled successfully",
        "booking_reference": "TKT9F8E7D6C"
    }))
    .into_response()
}

async fn validation_error() -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "detail": [{ "loc": ["body", "fare"], "msg": "field required" }] })),
    )
        .into_response()
}

async fn spawn_backend() -> (SocketAddr, Shared) {
    let state: Shared = Arc::new(Mutex::new(Recorded::default()));
    let app = Router::new()
        .route("/health", get(|| async { Json(json!({ "status": "healthy" })) }))
        .route("/auth/login", post(login))
        .route("/users/me", get(me))
        .route("/locations/", post(create_location))
        .route("/locations/:id", delete(delete_location))
        .route("/trains/", post(validation_error))
        .route("/trains/search", get(search))
        .route("/bookings/", post(create_booking))
        .route("/bookings/:id", delete(cancel_booking))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (addr, state)
}

fn client_for(addr: SocketAddr, storage: Arc<MemoryStorage>) -> ApiClient {
    ApiClient::new(format!("http://{}/", addr), storage)
}

/// Login posts form-encoded credentials and returns the token
#[tokio::test]
async fn test_login_and_profile_with_bearer_token() {
    let (addr, _) = spawn_backend().await;
    let storage = Arc::new(MemoryStorage::new());
    let client = client_for(addr, storage.clone());

    let unauthenticated = client.current_user().await.unwrap_err();
    assert!(unauthenticated.is_unauthorized());

    let token = client
        .login(&Credentials {
            username: "asha".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(token.access_token, TOKEN);

    storage.set_token(&token.access_token).unwrap();
    let user = client.current_user().await.unwrap();
    assert_eq!(user.username, "asha");
    assert!(!user.is_admin);
}

/// Failed login surfaces the server detail
#[tokio::test]
async fn test_login_failure_detail() {
    let (addr, _) = spawn_backend().await;
    let client = client_for(addr, Arc::new(MemoryStorage::new()));

    let err = client
        .login(&Credentials {
            username: "asha".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.detail(), Some("Incorrect username or password"));
}

/// Search sends exactly the selected parameters
#[tokio::test]
async fn test_search_sends_only_selected_params() {
    let (addr, state) = spawn_backend().await;
    let client = client_for(addr, Arc::new(MemoryStorage::with_token(TOKEN)));

    let both = client
        .search_trains(&TrainQuery {
            source_id: Some(1),
            destination_id: Some(2),
        })
        .await
        .unwrap();
    assert_eq!(both.len(), 1);
    assert!(both.iter().all(|t| t.source_id == 1 && t.destination_id == 2));

    let dest_only = client
        .search_trains(&TrainQuery {
            source_id: None,
            destination_id: Some(2),
        })
        .await
        .unwrap();
    assert_eq!(dest_only.len(), 2);
    assert!(dest_only.iter().all(|t| t.destination_id == 2));

    let queries = state.lock().unwrap().search_queries.clone();
    assert_eq!(
        queries,
        vec![
            Some("source_id=1&destination_id=2".to_string()),
            Some("destination_id=2".to_string()),
        ]
    );
}

/// Create, delete and validation errors
#[tokio::test]
async fn test_location_create_and_delete() {
    let (addr, state) = spawn_backend().await;
    let client = client_for(addr, Arc::new(MemoryStorage::with_token(TOKEN)));

    let created = client
        .create_location(&NewLocation {
            name: "Mysuru Junction".to_string(),
            code: "MYS".to_string(),
            city: "Mysuru".to_string(),
            state: "Karnataka".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, 10);
    assert_eq!(created.label(), "Mysuru Junction (MYS)");

    let duplicate = client
        .create_location(&NewLocation {
            name: "Chennai Central".to_string(),
            code: "MAS".to_string(),
            city: "Chennai".to_string(),
            state: "Tamil Nadu".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(duplicate.detail(), Some("Location code already exists"));

    client.delete_location(10).await.unwrap();
    assert_eq!(state.lock().unwrap().deleted_locations, vec![10]);
}

/// Booking lifecycle through the client
#[tokio::test]
async fn test_booking_create_and_cancel() {
    let (addr, _) = spawn_backend().await;
    let client = client_for(addr, Arc::new(MemoryStorage::with_token(TOKEN)));

    let booking = NewBooking {
        train_id: 1,
        journey_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        passenger_name: "Ravi".to_string(),
        passenger_age: 30,
        passenger_gender: "Male".to_string(),
    };
    let created = client.create_booking(&booking).await.unwrap();
    assert_eq!(created.booking_reference, "TKT9F8E7D6C");
    assert_eq!(created.seat_number.as_deref(), Some("S41"));

    let sold_out = client
        .create_booking(&NewBooking {
            train_id: 3,
            ..booking
        })
        .await
        .unwrap_err();
    assert_eq!(sold_out.message_or("Booking failed"), "No seats available");

    let receipt = client.cancel_booking(77).await.unwrap();
    assert_eq!(receipt.booking_reference, "TKT9F8E7D6C");

    let missing = client.cancel_booking(404).await.unwrap_err();
    assert_eq!(missing.status(), Some(404));
}

/// Structured validation errors fall back to the view message
#[tokio::test]
async fn test_validation_error_has_no_display_detail() {
    let (addr, _) = spawn_backend().await;
    let client = client_for(addr, Arc::new(MemoryStorage::with_token(TOKEN)));

    let train = railbook_core::models::NewTrain {
        train_number: "1".to_string(),
        train_name: "Local".to_string(),
        source_id: 1,
        destination_id: 2,
        departure_time: chrono::NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        arrival_time: chrono::NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
        total_seats: 10,
        fare: 10,
    };
    let err = client.create_train(&train).await.unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert_eq!(err.message_or("Failed to add train"), "Failed to add train");
}

/// Health check reports reachability
#[tokio::test]
async fn test_health() {
    let (addr, _) = spawn_backend().await;
    let client = client_for(addr, Arc::new(MemoryStorage::new()));
    assert!(client.health().await.unwrap());

    let unreachable = ApiClient::new("http://127.0.0.1:1", Arc::new(MemoryStorage::new()));
    assert!(!unreachable.health().await.unwrap());
}
