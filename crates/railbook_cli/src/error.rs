//! CLI error types.

use railbook_client::{ApiError, ConfigError, StorageError};
use railbook_core::FormError;
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// The backend rejected the request; shows its message when it sent one
    #[error("{}", api_message(.0))]
    Api(#[from] ApiError),

    /// A flag failed the same checks the forms apply
    #[error("{0}")]
    Form(#[from] FormError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Token storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// No stored token
    #[error("Not logged in. Run `railbook login` first")]
    NotLoggedIn,

    /// Health check failed
    #[error("Backend at {0} is not reachable")]
    Unreachable(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The user answered no to a confirmation prompt
    #[error("Aborted")]
    Aborted,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn api_message(err: &ApiError) -> String {
    err.message_or(&err.to_string())
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
