//! Error types for form coercion.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while coercing raw form text into a typed payload.
///
/// These never reach the backend: a draft that fails coercion is not
/// submitted.
///
/// # Examples
/// ```
/// use railbook_core::FormError;
///
/// let err = FormError::Missing { field: "Username" };
/// assert_eq!(err.to_string(), "Username is required");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A required field was left blank.
    #[error("{field} is required")]
    Missing {
        /// Field label
        field: &'static str,
    },

    /// A field could not be parsed into its expected type.
    #[error("Invalid {field} '{value}': expected {expected}")]
    Invalid {
        /// Field label
        field: &'static str,
        /// Raw text entered
        value: String,
        /// Human readable description of the expected format
        expected: &'static str,
    },

    /// A numeric field fell outside its accepted bounds.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Field label
        field: &'static str,
        /// Parsed value
        value: i64,
        /// Inclusive lower bound
        min: i64,
        /// Inclusive upper bound
        max: i64,
    },

    /// A date field is earlier than the first selectable date.
    #[error("{field} must be on or after {earliest}")]
    DateTooEarly {
        /// Field label
        field: &'static str,
        /// First accepted date
        earliest: NaiveDate,
    },
}
