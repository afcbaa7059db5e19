//! # railbook_client
//!
//! Client layer for the Railbook booking backend.
//!
//! - [`BookingApi`]: one async method per backend endpoint
//! - [`ApiClient`]: the reqwest implementation, attaching the stored bearer
//!   token to every request
//! - [`LocalStorage`]: persisted key/value store holding the `token` key
//! - [`ClientConfig`]: base URL, storage path, timeout and logging settings
//!
//! ## Error Surface
//!
//! Every call returns [`ApiError`]. When the backend answers with a
//! `{"detail": "..."}` body, [`ApiError::detail`] exposes that message so
//! views can show it verbatim.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod storage;

pub use api::BookingApi;
pub use client::ApiClient;
pub use config::{ClientConfig, ConfigError, LogLevel};
pub use error::ApiError;
pub use storage::{FileStorage, LocalStorage, MemoryStorage, StorageError, TOKEN_KEY};

