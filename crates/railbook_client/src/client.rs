//! reqwest implementation of [`BookingApi`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use railbook_core::models::{
    AccessToken, Booking, CancelReceipt, Credentials, Location, LocationUpdate, NewBooking,
    NewLocation, NewTrain, NewUser, Train, TrainQuery, TrainUpdate, User,
};

use crate::api::BookingApi;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::storage::LocalStorage;

/// API client for the booking backend
///
/// Reads the token from storage on every request, so a login performed
/// elsewhere is picked up without rebuilding the client.
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    storage: Arc<dyn LocalStorage>,
}

impl ApiClient {
    /// Create a new API client with the transport's default timeout
    pub fn new(base_url: impl Into<String>, storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            base_url: normalise_base_url(base_url.into()),
            client: reqwest::Client::new(),
            storage,
        }
    }

    /// Create a client from configuration
    pub fn from_config(
        config: &ClientConfig,
        storage: Arc<dyn LocalStorage>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: normalise_base_url(config.base_url.clone()),
            client,
            storage,
        })
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "backend request");

        let builder = self.client.request(method, url);
        match self.storage.token()? {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Ok(builder),
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "backend returned an error");
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "backend returned an error");
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        Ok(())
    }
}

fn normalise_base_url(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[async_trait]
impl BookingApi for ApiClient {
    async fn health(&self) -> Result<bool, ApiError> {
        let request = self.request(Method::GET, "/health")?;
        match request.send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    async fn register(&self, user: &NewUser) -> Result<User, ApiError> {
        let request = self.request(Method::POST, "/auth/register")?.json(user);
        self.send_json(request).await
    }

    async fn register_admin(&self, user: &NewUser) -> Result<User, ApiError> {
        let request = self.request(Method::POST, "/auth/register-admin")?.json(user);
        self.send_json(request).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<AccessToken, ApiError> {
        let request = self.request(Method::POST, "/auth/login")?.form(&[
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ]);
        self.send_json(request).await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        let request = self.request(Method::GET, "/users/me")?;
        self.send_json(request).await
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let request = self.request(Method::GET, "/users/")?;
        self.send_json(request).await
    }

    async fn create_location(&self, location: &NewLocation) -> Result<Location, ApiError> {
        let request = self.request(Method::POST, "/locations/")?.json(location);
        self.send_json(request).await
    }

    async fn list_locations(&self) -> Result<Vec<Location>, ApiError> {
        let request = self.request(Method::GET, "/locations/")?;
        self.send_json(request).await
    }

    async fn get_location(&self, id: i64) -> Result<Location, ApiError> {
        let request = self.request(Method::GET, &format!("/locations/{}", id))?;
        self.send_json(request).await
    }

    async fn update_location(
        &self,
        id: i64,
        update: &LocationUpdate,
    ) -> Result<Location, ApiError> {
        let request = self
            .request(Method::PUT, &format!("/locations/{}", id))?
            .json(update);
        self.send_json(request).await
    }

    async fn delete_location(&self, id: i64) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("/locations/{}", id))?;
        self.send_empty(request).await
    }

    async fn create_train(&self, train: &NewTrain) -> Result<Train, ApiError> {
        let request = self.request(Method::POST, "/trains/")?.json(train);
        self.send_json(request).await
    }

    async fn list_trains(&self) -> Result<Vec<Train>, ApiError> {
        let request = self.request(Method::GET, "/trains/")?;
        self.send_json(request).await
    }

    async fn get_train(&self, id: i64) -> Result<Train, ApiError> {
        let request = self.request(Method::GET, &format!("/trains/{}", id))?;
        self.send_json(request).await
    }

    async fn search_trains(&self, query: &TrainQuery) -> Result<Vec<Train>, ApiError> {
        let request = self
            .request(Method::GET, "/trains/search")?
            .query(&query.params());
        self.send_json(request).await
    }

    async fn update_train(&self, id: i64, update: &TrainUpdate) -> Result<Train, ApiError> {
        let request = self
            .request(Method::PUT, &format!("/trains/{}", id))?
            .json(update);
        self.send_json(request).await
    }

    async fn delete_train(&self, id: i64) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("/trains/{}", id))?;
        self.send_empty(request).await
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, ApiError> {
        let request = self.request(Method::POST, "/bookings/")?.json(booking);
        self.send_json(request).await
    }

    async fn my_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        let request = self.request(Method::GET, "/bookings/my-bookings")?;
        self.send_json(request).await
    }

    async fn all_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        let request = self.request(Method::GET, "/bookings/all")?;
        self.send_json(request).await
    }

    async fn get_booking(&self, id: i64) -> Result<Booking, ApiError> {
        let request = self.request(Method::GET, &format!("/bookings/{}", id))?;
        self.send_json(request).await
    }

    async fn cancel_booking(&self, id: i64) -> Result<CancelReceipt, ApiError> {
        let request = self.request(Method::DELETE, &format!("/bookings/{}", id))?;
        self.send_json(request).await
    }
}
