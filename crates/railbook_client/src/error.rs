//! Error type for backend calls.

use serde::Deserialize;
use thiserror::Error;

use crate::storage::StorageError;

/// Backend call error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("request failed"))]
    Http {
        /// Status code
        status: u16,
        /// Human readable message from the `detail` field, when present
        detail: Option<String>,
    },

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The token could not be read from or written to local storage.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Error body shape used by the backend.
#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl ApiError {
    /// Build an HTTP error from a status code and raw response body.
    ///
    /// Only a string `detail` is kept; structured validation payloads are
    /// not meant for display.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| match b.detail {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
                _ => None,
            });
        Self::Http { status, detail }
    }

    /// Server-provided message, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Http { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Server-provided message, or `fallback` when there is none.
    pub fn message_or(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }

    /// HTTP status, for errors that carry one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 401 responses.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
