//! Backend endpoint surface.
//!
//! One method per endpoint. Views and the CLI depend on this trait rather
//! than on [`ApiClient`](crate::ApiClient) so they can run against an
//! in-memory backend in tests.

use async_trait::async_trait;
use railbook_core::models::{
    AccessToken, Booking, CancelReceipt, Credentials, Location, LocationUpdate, NewBooking,
    NewLocation, NewTrain, NewUser, Train, TrainQuery, TrainUpdate, User,
};

use crate::error::ApiError;

/// Booking backend API
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// `GET /health`
    async fn health(&self) -> Result<bool, ApiError>;

    // --- auth ---

    /// `POST /auth/register`
    async fn register(&self, user: &NewUser) -> Result<User, ApiError>;

    /// `POST /auth/register-admin`
    async fn register_admin(&self, user: &NewUser) -> Result<User, ApiError>;

    /// `POST /auth/login` with form-encoded credentials
    async fn login(&self, credentials: &Credentials) -> Result<AccessToken, ApiError>;

    // --- users ---

    /// `GET /users/me`
    async fn current_user(&self) -> Result<User, ApiError>;

    /// `GET /users/` (admin)
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;

    // --- locations ---

    /// `POST /locations/` (admin)
    async fn create_location(&self, location: &NewLocation) -> Result<Location, ApiError>;

    /// `GET /locations/`
    async fn list_locations(&self) -> Result<Vec<Location>, ApiError>;

    /// `GET /locations/:id`
    async fn get_location(&self, id: i64) -> Result<Location, ApiError>;

    /// `PUT /locations/:id` (admin)
    async fn update_location(&self, id: i64, update: &LocationUpdate)
        -> Result<Location, ApiError>;

    /// `DELETE /locations/:id` (admin)
    async fn delete_location(&self, id: i64) -> Result<(), ApiError>;

    // --- trains ---

    /// `POST /trains/` (admin)
    async fn create_train(&self, train: &NewTrain) -> Result<Train, ApiError>;

    /// `GET /trains/`
    async fn list_trains(&self) -> Result<Vec<Train>, ApiError>;

    /// `GET /trains/:id`
    async fn get_train(&self, id: i64) -> Result<Train, ApiError>;

    /// `GET /trains/search` with only the set parameters
    async fn search_trains(&self, query: &TrainQuery) -> Result<Vec<Train>, ApiError>;

    /// `PUT /trains/:id` (admin)
    async fn update_train(&self, id: i64, update: &TrainUpdate) -> Result<Train, ApiError>;

    /// `DELETE /trains/:id` (admin)
    async fn delete_train(&self, id: i64) -> Result<(), ApiError>;

    // --- bookings ---

    /// `POST /bookings/`
    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, ApiError>;

    /// `GET /bookings/my-bookings`
    async fn my_bookings(&self) -> Result<Vec<Booking>, ApiError>;

    /// `GET /bookings/all` (admin)
    async fn all_bookings(&self) -> Result<Vec<Booking>, ApiError>;

    /// `GET /bookings/:id`
    async fn get_booking(&self, id: i64) -> Result<Booking, ApiError>;

    /// `DELETE /bookings/:id`
    async fn cancel_booking(&self, id: i64) -> Result<CancelReceipt, ApiError>;
}
