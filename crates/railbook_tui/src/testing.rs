//! In-memory backend for view and session tests, plus a backend that hangs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use railbook_client::{ApiClient, ApiError, BookingApi, LocalStorage};
use railbook_core::models::{
    AccessToken, Booking, BookingStatus, CancelReceipt, Credentials, Location, LocationUpdate,
    NewBooking, NewLocation, NewTrain, NewUser, Train, TrainQuery, TrainUpdate, User,
};
use tokio::net::TcpListener;

pub(crate) const ADMIN_TOKEN: &str = "tok-admin";
pub(crate) const USER_TOKEN: &str = "tok-ravi";
pub(crate) const PASSWORD: &str = "secret";

/// A real client pointed at a socket that accepts connections and never answers
pub(crate) async fn unresponsive_api(storage: Arc<dyn LocalStorage>) -> Arc<ApiClient> {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    Arc::new(ApiClient::new(format!("http://{}", addr), storage))
}

pub(crate) fn admin_user() -> User {
    User {
        id: 1,
        username: "admin".to_string(),
        email: "admin@example.com".to_string(),
        full_name: None,
        is_admin: true,
        is_active: true,
    }
}

pub(crate) fn regular_user() -> User {
    User {
        id: 2,
        username: "ravi".to_string(),
        email: "ravi@example.com".to_string(),
        full_name: Some("Ravi Kumar".to_string()),
        is_admin: false,
        is_active: true,
    }
}

pub(crate) fn location(id: i64, name: &str, code: &str) -> Location {
    Location {
        id,
        name: name.to_string(),
        code: code.to_string(),
        city: name.split(' ').next().unwrap_or(name).to_string(),
        state: "Karnataka".to_string(),
        created_at: None,
    }
}

pub(crate) fn train(id: i64, source_id: i64, destination_id: i64, available: i32) -> Train {
    Train {
        id,
        train_number: format!("1200{}", id),
        train_name: format!("Express {}", id),
        source_id,
        destination_id,
        departure_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        arrival_time: NaiveTime::from_hms_opt(11, 30, 0).unwrap(),
        total_seats: 50,
        available_seats: available,
        fare: 450,
        created_at: None,
    }
}

pub(crate) fn booking(id: i64, user_id: i64, train_id: i64, status: BookingStatus) -> Booking {
    Booking {
        id,
        booking_reference: format!("TKT{:08}", id),
        user_id: Some(user_id),
        train_id,
        journey_date: NaiveDate::from_ymd_opt(2030, 1, 15).unwrap(),
        passenger_name: "Ravi Kumar".to_string(),
        passenger_age: 34,
        passenger_gender: "Male".to_string(),
        seat_number: Some(format!("S{}", id)),
        total_fare: 450,
        status,
        created_at: None,
    }
}

struct FakeState {
    calls: Vec<&'static str>,
    failures: HashMap<&'static str, (u16, Option<String>)>,
    search_queries: Vec<TrainQuery>,
    users: Vec<User>,
    locations: Vec<Location>,
    trains: Vec<Train>,
    bookings: Vec<Booking>,
    next_id: i64,
}

/// Backend double that answers from fixtures and records every call.
///
/// Reads the bearer token from the same storage the views write to.
pub(crate) struct FakeApi {
    storage: Arc<dyn LocalStorage>,
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub(crate) fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            storage,
            state: Mutex::new(FakeState {
                calls: Vec::new(),
                failures: HashMap::new(),
                search_queries: Vec::new(),
                users: vec![admin_user(), regular_user()],
                locations: vec![
                    location(1, "Bengaluru City", "SBC"),
                    location(2, "Chennai Central", "MAS"),
                    location(3, "Mysuru Junction", "MYS"),
                ],
                trains: vec![train(1, 1, 2, 10), train(2, 1, 3, 10), train(3, 3, 2, 0)],
                bookings: vec![
                    booking(1, 2, 1, BookingStatus::Confirmed),
                    booking(2, 2, 2, BookingStatus::Cancelled),
                    booking(3, 1, 1, BookingStatus::Confirmed),
                ],
                next_id: 100,
            }),
        }
    }

    /// Make every later call to `method` fail with `status` and `detail`.
    pub(crate) fn fail(&self, method: &'static str, status: u16, detail: Option<&str>) {
        self.lock()
            .failures
            .insert(method, (status, detail.map(str::to_string)));
    }

    pub(crate) fn calls_to(&self, method: &str) -> usize {
        self.lock().calls.iter().filter(|c| **c == method).count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.lock().calls.len()
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    pub(crate) fn search_queries(&self) -> Vec<TrainQuery> {
        self.lock().search_queries.clone()
    }

    pub(crate) fn locations(&self) -> Vec<Location> {
        self.lock().locations.clone()
    }

    pub(crate) fn trains(&self) -> Vec<Train> {
        self.lock().trains.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn enter(&self, method: &'static str) -> Result<MutexGuard<'_, FakeState>, ApiError> {
        let mut state = self.lock();
        state.calls.push(method);
        if let Some((status, detail)) = state.failures.get(method).cloned() {
            return Err(ApiError::Http { status, detail });
        }
        Ok(state)
    }

    fn caller(&self, state: &FakeState) -> Result<User, ApiError> {
        let token = self.storage.token()?;
        let user = match token.as_deref() {
            Some(ADMIN_TOKEN) => state.users.iter().find(|u| u.is_admin),
            Some(USER_TOKEN) => state.users.iter().find(|u| u.username == "ravi"),
            _ => None,
        };
        user.cloned().ok_or(ApiError::Http {
            status: 401,
            detail: Some("Could not validate credentials".to_string()),
        })
    }

    fn next_id(state: &mut FakeState) -> i64 {
        state.next_id += 1;
        state.next_id
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::Http {
        status: 404,
        detail: Some(format!("{} not found", what)),
    }
}

#[async_trait]
impl BookingApi for FakeApi {
    async fn health(&self) -> Result<bool, ApiError> {
        self.enter("health")?;
        Ok(true)
    }

    async fn register(&self, user: &NewUser) -> Result<User, ApiError> {
        let mut state = self.enter("register")?;
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(ApiError::Http {
                status: 400,
                detail: Some("Username already registered".to_string()),
            });
        }
        let created = User {
            id: Self::next_id(&mut state),
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            is_admin: false,
            is_active: true,
        };
        state.users.push(created.clone());
        Ok(created)
    }

    async fn register_admin(&self, user: &NewUser) -> Result<User, ApiError> {
        let mut state = self.enter("register_admin")?;
        let created = User {
            id: Self::next_id(&mut state),
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            is_admin: true,
            is_active: true,
        };
        state.users.push(created.clone());
        Ok(created)
    }

    async fn login(&self, credentials: &Credentials) -> Result<AccessToken, ApiError> {
        self.enter("login")?;
        let token = match (credentials.username.as_str(), credentials.password.as_str()) {
            ("admin", PASSWORD) => ADMIN_TOKEN,
            ("ravi", PASSWORD) => USER_TOKEN,
            _ => {
                return Err(ApiError::Http {
                    status: 401,
                    detail: Some("Incorrect username or password".to_string()),
                })
            }
        };
        Ok(AccessToken {
            access_token: token.to_string(),
            token_type: Some("bearer".to_string()),
        })
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        let state = self.enter("current_user")?;
        self.caller(&state)
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let state = self.enter("list_users")?;
        Ok(state.users.clone())
    }

    async fn create_location(&self, location: &NewLocation) -> Result<Location, ApiError> {
        let mut state = self.enter("create_location")?;
        if state.locations.iter().any(|l| l.code == location.code) {
            return Err(ApiError::Http {
                status: 400,
                detail: Some("Location code already exists".to_string()),
            });
        }
        let created = Location {
            id: Self::next_id(&mut state),
            name: location.name.clone(),
            code: location.code.clone(),
            city: location.city.clone(),
            state: location.state.clone(),
            created_at: None,
        };
        state.locations.push(created.clone());
        Ok(created)
    }

    async fn list_locations(&self) -> Result<Vec<Location>, ApiError> {
        let state = self.enter("list_locations")?;
        Ok(state.locations.clone())
    }

    async fn get_location(&self, id: i64) -> Result<Location, ApiError> {
        let state = self.enter("get_location")?;
        state
            .locations
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or_else(|| not_found("Location"))
    }

    async fn update_location(
        &self,
        id: i64,
        update: &LocationUpdate,
    ) -> Result<Location, ApiError> {
        let mut state = self.enter("update_location")?;
        let location = state
            .locations
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| not_found("Location"))?;
        if let Some(name) = &update.name {
            location.name = name.clone();
        }
        if let Some(code) = &update.code {
            location.code = code.clone();
        }
        if let Some(city) = &update.city {
            location.city = city.clone();
        }
        if let Some(region) = &update.state {
            location.state = region.clone();
        }
        Ok(location.clone())
    }

    async fn delete_location(&self, id: i64) -> Result<(), ApiError> {
        let mut state = self.enter("delete_location")?;
        let before = state.locations.len();
        state.locations.retain(|l| l.id != id);
        if state.locations.len() == before {
            return Err(not_found("Location"));
        }
        Ok(())
    }

    async fn create_train(&self, train: &NewTrain) -> Result<Train, ApiError> {
        let mut state = self.enter("create_train")?;
        let created = Train {
            id: Self::next_id(&mut state),
            train_number: train.train_number.clone(),
            train_name: train.train_name.clone(),
            source_id: train.source_id,
            destination_id: train.destination_id,
            departure_time: train.departure_time,
            arrival_time: train.arrival_time,
            total_seats: train.total_seats,
            available_seats: train.total_seats,
            fare: train.fare,
            created_at: None,
        };
        state.trains.push(created.clone());
        Ok(created)
    }

    async fn list_trains(&self) -> Result<Vec<Train>, ApiError> {
        let state = self.enter("list_trains")?;
        Ok(state.trains.clone())
    }

    async fn get_train(&self, id: i64) -> Result<Train, ApiError> {
        let state = self.enter("get_train")?;
        state
            .trains
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| not_found("Train"))
    }

    async fn search_trains(&self, query: &TrainQuery) -> Result<Vec<Train>, ApiError> {
        let mut state = self.enter("search_trains")?;
        state.search_queries.push(*query);
        Ok(state
            .trains
            .iter()
            .filter(|t| query.matches(t))
            .cloned()
            .collect())
    }

    async fn update_train(&self, id: i64, update: &TrainUpdate) -> Result<Train, ApiError> {
        let mut state = self.enter("update_train")?;
        let train = state
            .trains
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("Train"))?;
        if let Some(name) = &update.train_name {
            train.train_name = name.clone();
        }
        if let Some(number) = &update.train_number {
            train.train_number = number.clone();
        }
        if let Some(fare) = update.fare {
            train.fare = fare;
        }
        if let Some(seats) = update.total_seats {
            train.total_seats = seats;
        }
        Ok(train.clone())
    }

    async fn delete_train(&self, id: i64) -> Result<(), ApiError> {
        let mut state = self.enter("delete_train")?;
        let before = state.trains.len();
        state.trains.retain(|t| t.id != id);
        if state.trains.len() == before {
            return Err(not_found("Train"));
        }
        Ok(())
    }

    async fn create_booking(&self, new: &NewBooking) -> Result<Booking, ApiError> {
        let mut state = self.enter("create_booking")?;
        let user = self.caller(&state)?;
        let id = Self::next_id(&mut state);
        let train = state
            .trains
            .iter_mut()
            .find(|t| t.id == new.train_id)
            .ok_or_else(|| not_found("Train"))?;
        if train.available_seats <= 0 {
            return Err(ApiError::Http {
                status: 400,
                detail: Some("No seats available".to_string()),
            });
        }
        train.available_seats -= 1;
        let created = Booking {
            id,
            booking_reference: format!("TKT{:08}", id),
            user_id: Some(user.id),
            train_id: new.train_id,
            journey_date: new.journey_date,
            passenger_name: new.passenger_name.clone(),
            passenger_age: new.passenger_age,
            passenger_gender: new.passenger_gender.clone(),
            seat_number: Some(format!("S{}", train.total_seats - train.available_seats)),
            total_fare: train.fare,
            status: BookingStatus::Confirmed,
            created_at: None,
        };
        state.bookings.push(created.clone());
        Ok(created)
    }

    async fn my_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        let state = self.enter("my_bookings")?;
        let user = self.caller(&state)?;
        Ok(state
            .bookings
            .iter()
            .filter(|b| b.user_id == Some(user.id))
            .cloned()
            .collect())
    }

    async fn all_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        let state = self.enter("all_bookings")?;
        Ok(state.bookings.clone())
    }

    async fn get_booking(&self, id: i64) -> Result<Booking, ApiError> {
        let state = self.enter("get_booking")?;
        state
            .bookings
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| not_found("Booking"))
    }

    async fn cancel_booking(&self, id: i64) -> Result<CancelReceipt, ApiError> {
        let mut state = self.enter("cancel_booking")?;
        let booking = state
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| not_found("Booking"))?;
        if booking.status == BookingStatus::Cancelled {
            return Err(ApiError::Http {
                status: 400,
                detail: Some("Booking already cancelled".to_string()),
            });
        }
        booking.status = BookingStatus::Cancelled;
        Ok(CancelReceipt {
            message: "Booking cancelled successfully".to_string(),
            booking_reference: booking.booking_reference.clone(),
        })
    }
}
