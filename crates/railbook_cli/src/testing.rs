//! In-process mock backend for command tests.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::NaiveDate;
use railbook_client::{ApiClient, LocalStorage, MemoryStorage};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::commands::Context;
use crate::output::OutputFormat;

pub const TOKEN: &str = "tok-ravi";
pub const PASSWORD: &str = "secret";

#[derive(Default)]
pub struct Recorded {
    /// `METHOD path` of every request
    pub calls: Vec<String>,
    /// Bodies of PUT requests
    pub updates: Vec<Value>,
}

#[derive(Clone)]
struct Shared {
    recorded: Arc<Mutex<Recorded>>,
    bookings: Arc<Mutex<Vec<Value>>>,
}

impl Shared {
    fn record(&self, call: String) {
        self.recorded.lock().unwrap().calls.push(call);
    }
}

fn error(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn authorised(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v == format!("Bearer {}", TOKEN))
}

fn user_json() -> Value {
    json!({
        "id": 2, "username": "ravi", "email": "ravi@example.com",
        "full_name": "Ravi Kumar", "is_active": true, "is_admin": false
    })
}

fn locations_json() -> Value {
    json!([
        { "id": 1, "name": "Bengaluru City", "code": "SBC", "city": "Bengaluru", "state": "Karnataka" },
        { "id": 2, "name": "Chennai Central", "code": "MAS", "city": "Chennai", "state": "Tamil Nadu" }
    ])
}

fn train_json(id: i64, available: i64) -> Value {
    json!({
        "id": id,
        "train_number": format!("1200{}", id),
        "train_name": format!("Express {}", id),
        "source_id": 1,
        "destination_id": 2,
        "departure_time": "06:00:00",
        "arrival_time": "11:30:00",
        "total_seats": 50,
        "available_seats": available,
        "fare": 450
    })
}

fn trains_json() -> Vec<Value> {
    vec![train_json(1, 10), train_json(2, 0)]
}

fn booking_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "booking_reference": format!("TKT{:08}", id),
        "user_id": 2,
        "train_id": 1,
        "journey_date": "2030-01-15",
        "passenger_name": "Ravi Kumar",
        "passenger_age": 34,
        "passenger_gender": "Male",
        "seat_number": format!("S{}", id),
        "total_fare": 450,
        "status": status
    })
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(shared): State<Shared>, Form(form): Form<LoginForm>) -> Response {
    shared.record("POST /auth/login".to_string());
    if form.username == "ravi" && form.password == PASSWORD {
        Json(json!({ "access_token": TOKEN, "token_type": "bearer" })).into_response()
    } else {
        error(StatusCode::UNAUTHORIZED, "Incorrect username or password")
    }
}

async fn register(State(shared): State<Shared>, Json(body): Json<Value>) -> Response {
    shared.record("POST /auth/register".to_string());
    if body["username"] == "ravi" {
        return error(StatusCode::BAD_REQUEST, "Username already registered");
    }
    Json(json!({
        "id": 9, "username": body["username"], "email": body["email"],
        "full_name": body["full_name"], "is_active": true, "is_admin": false
    }))
    .into_response()
}

async fn register_admin(State(shared): State<Shared>, Json(body): Json<Value>) -> Response {
    shared.record("POST /auth/register-admin".to_string());
    Json(json!({
        "id": 10, "username": body["username"], "email": body["email"],
        "full_name": null, "is_active": true, "is_admin": true
    }))
    .into_response()
}

async fn me(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    shared.record("GET /users/me".to_string());
    if !authorised(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Could not validate credentials");
    }
    Json(user_json()).into_response()
}

async fn users(State(shared): State<Shared>) -> Response {
    shared.record("GET /users/".to_string());
    Json(json!([user_json()])).into_response()
}

async fn list_locations(State(shared): State<Shared>) -> Response {
    shared.record("GET /locations/".to_string());
    Json(locations_json()).into_response()
}

async fn create_location(State(shared): State<Shared>, Json(body): Json<Value>) -> Response {
    shared.record("POST /locations/".to_string());
    if body["code"] == "SBC" {
        return error(StatusCode::BAD_REQUEST, "Location code already exists");
    }
    let mut created = body;
    created["id"] = json!(3);
    Json(created).into_response()
}

async fn delete_location(State(shared): State<Shared>, Path(id): Path<i64>) -> Response {
    shared.record(format!("DELETE /locations/{}", id));
    Json(json!({ "message": "Location deleted successfully" })).into_response()
}

async fn list_trains(State(shared): State<Shared>) -> Response {
    shared.record("GET /trains/".to_string());
    Json(trains_json()).into_response()
}

#[derive(Deserialize)]
struct SearchParams {
    source_id: Option<i64>,
    destination_id: Option<i64>,
}

async fn search(State(shared): State<Shared>, Query(params): Query<SearchParams>) -> Response {
    shared.record(format!(
        "GET /trains/search?{:?},{:?}",
        params.source_id, params.destination_id
    ));
    let trains: Vec<Value> = trains_json()
        .into_iter()
        .filter(|t| params.source_id.map_or(true, |s| t["source_id"] == s))
        .filter(|t| params.destination_id.map_or(true, |d| t["destination_id"] == d))
        .filter(|t| t["available_seats"].as_i64().unwrap_or(0) > 0)
        .collect();
    Json(trains).into_response()
}

async fn get_train(State(shared): State<Shared>, Path(id): Path<i64>) -> Response {
    shared.record(format!("GET /trains/{}", id));
    match trains_json().into_iter().find(|t| t["id"] == id) {
        Some(train) => Json(train).into_response(),
        None => error(StatusCode::NOT_FOUND, "Train not found"),
    }
}

async fn update_train(
    State(shared): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    shared.record(format!("PUT /trains/{}", id));
    shared.recorded.lock().unwrap().updates.push(body.clone());
    let mut train = train_json(id, 10);
    if let Value::Object(changes) = body {
        for (key, value) in changes {
            train[key] = value;
        }
    }
    Json(train).into_response()
}

async fn create_booking(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    shared.record("POST /bookings/".to_string());
    if !authorised(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Could not validate credentials");
    }
    let mut booking = booking_json(100, "confirmed");
    booking["passenger_name"] = body["passenger_name"].clone();
    booking["journey_date"] = body["journey_date"].clone();
    Json(booking).into_response()
}

async fn my_bookings(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    shared.record("GET /bookings/my-bookings".to_string());
    if !authorised(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Could not validate credentials");
    }
    let bookings = shared.bookings.lock().unwrap().clone();
    Json(bookings).into_response()
}

async fn get_booking(State(shared): State<Shared>, Path(id): Path<i64>) -> Response {
    shared.record(format!("GET /bookings/{}", id));
    let bookings = shared.bookings.lock().unwrap();
    match bookings.iter().find(|b| b["id"] == id) {
        Some(booking) => Json(booking.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "Booking not found"),
    }
}

async fn cancel_booking(State(shared): State<Shared>, Path(id): Path<i64>) -> Response {
    shared.record(format!("DELETE /bookings/{}", id));
    let mut bookings = shared.bookings.lock().unwrap();
    match bookings.iter_mut().find(|b| b["id"] == id) {
        Some(booking) => {
            booking["status"] = json!("cancelled");
            Json(json!({
                "message": "Booking cancelled successfully",
                "booking_reference": booking["booking_reference"]
            }))
            .into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Booking not found"),
    }
}

/// Running mock backend plus the client pointed at it.
pub struct MockBackend {
    pub api: ApiClient,
    pub storage: Arc<MemoryStorage>,
    recorded: Arc<Mutex<Recorded>>,
}

impl MockBackend {
    /// Start a backend with bookings 1 (confirmed) and 2 (cancelled).
    pub async fn start() -> Self {
        let shared = Shared {
            recorded: Arc::default(),
            bookings: Arc::new(Mutex::new(vec![
                booking_json(1, "confirmed"),
                booking_json(2, "cancelled"),
            ])),
        };

        let app = Router::new()
            .route("/health", get(|| async { Json(json!({ "status": "healthy" })) }))
            .route("/auth/login", post(login))
            .route("/auth/register", post(register))
            .route("/auth/register-admin", post(register_admin))
            .route("/users/me", get(me))
            .route("/users/", get(users))
            .route("/locations/", get(list_locations).post(create_location))
            .route("/locations/:id", axum::routing::delete(delete_location))
            .route("/trains/", get(list_trains))
            .route("/trains/search", get(search))
            .route("/trains/:id", get(get_train).put(update_train))
            .route("/bookings/", post(create_booking))
            .route("/bookings/my-bookings", get(my_bookings))
            .route("/bookings/:id", get(get_booking).delete(cancel_booking))
            .with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let storage = Arc::new(MemoryStorage::new());
        let api = ApiClient::new(format!("http://{}", addr), storage.clone());
        Self {
            api,
            storage,
            recorded: shared.recorded,
        }
    }

    /// Same backend with the user already logged in.
    pub async fn logged_in() -> Self {
        let backend = Self::start().await;
        backend.storage.set_token(TOKEN).unwrap();
        backend
    }

    pub fn context(&self, format: OutputFormat) -> Context<'_> {
        Context {
            api: &self.api,
            storage: self.storage.as_ref(),
            format,
            today: NaiveDate::from_ymd_opt(2030, 1, 10).unwrap(),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.recorded.lock().unwrap().calls.clone()
    }

    pub fn updates(&self) -> Vec<Value> {
        self.recorded.lock().unwrap().updates.clone()
    }
}

/// Collect a command's output as text.
pub fn text(out: Vec<u8>) -> String {
    String::from_utf8(out).unwrap()
}
