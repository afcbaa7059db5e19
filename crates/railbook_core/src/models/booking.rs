use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gender choices offered by the booking form.
pub const GENDER_OPTIONS: [&str; 3] = ["Male", "Female", "Other"];

/// Server-side lifecycle of a booking.
///
/// The backend sends lower-case values; upper-case spellings are accepted
/// as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Awaiting confirmation
    #[serde(rename = "pending", alias = "PENDING")]
    Pending,
    /// Seat reserved
    #[serde(rename = "confirmed", alias = "CONFIRMED")]
    Confirmed,
    /// Cancelled by the passenger or an admin
    #[serde(rename = "cancelled", alias = "CANCELLED")]
    Cancelled,
}

impl BookingStatus {
    /// Upper-case label shown in lists.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Whether the client may request cancellation.
    pub fn is_cancellable(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A seat reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Backend identifier
    pub id: i64,
    /// Server-issued reference, e.g. `TKT1A2B3C4D`
    pub booking_reference: String,
    /// Owner account
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Booked train
    pub train_id: i64,
    /// Day of travel
    pub journey_date: NaiveDate,
    /// Passenger name
    pub passenger_name: String,
    /// Passenger age
    pub passenger_age: i32,
    /// Passenger gender
    pub passenger_gender: String,
    /// Allocated seat, once assigned
    #[serde(default)]
    pub seat_number: Option<String>,
    /// Fare charged
    pub total_fare: i64,
    /// Lifecycle state
    pub status: BookingStatus,
    /// Server timestamp, kept verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Payload for `POST /bookings/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBooking {
    /// Train to book
    pub train_id: i64,
    /// Day of travel
    pub journey_date: NaiveDate,
    /// Passenger name
    pub passenger_name: String,
    /// Passenger age
    pub passenger_age: i32,
    /// Passenger gender
    pub passenger_gender: String,
}

/// Response body of `DELETE /bookings/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CancelReceipt {
    /// Confirmation text from the server
    pub message: String,
    /// Reference of the cancelled booking
    pub booking_reference: String,
}
