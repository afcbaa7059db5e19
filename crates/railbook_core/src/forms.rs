//! Raw form drafts and their coercion into typed payloads.
//!
//! A draft holds exactly what the user typed. Coercion checks presence,
//! parses numbers, times and dates, and applies the input bounds of the
//! booking forms. Anything beyond that is the backend's job.

use chrono::{Days, NaiveDate, NaiveTime, Timelike};
use std::str::FromStr;

use crate::error::FormError;
use crate::models::{
    Credentials, Location, LocationUpdate, NewBooking, NewLocation, NewTrain, NewUser, Train,
    TrainUpdate,
};

/// Youngest passenger age accepted by the booking form.
pub const MIN_PASSENGER_AGE: i64 = 1;
/// Oldest passenger age accepted by the booking form.
pub const MAX_PASSENGER_AGE: i64 = 120;

/// Trim a required text field, rejecting blanks.
pub fn required(field: &'static str, value: &str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormError::Missing { field })
    } else {
        Ok(trimmed.to_string())
    }
}

/// Trim an optional text field; blanks become `None`.
pub fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse a required whole number.
pub fn parse_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, FormError> {
    let raw = required(field, value)?;
    raw.parse().map_err(|_| FormError::Invalid {
        field,
        value: raw,
        expected: "a whole number",
    })
}

/// Parse an optional id selection; blank means "any".
pub fn parse_optional_id(field: &'static str, value: &str) -> Result<Option<i64>, FormError> {
    match optional(value) {
        None => Ok(None),
        Some(_) => parse_number(field, value).map(Some),
    }
}

/// Parse a required number and check it against inclusive bounds.
pub fn parse_bounded(
    field: &'static str,
    value: &str,
    min: i64,
    max: i64,
) -> Result<i64, FormError> {
    let parsed: i64 = parse_number(field, value)?;
    if parsed < min || parsed > max {
        return Err(FormError::OutOfRange {
            field,
            value: parsed,
            min,
            max,
        });
    }
    Ok(parsed)
}

/// Parse a clock time as `HH:MM` or `HH:MM:SS`.
pub fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, FormError> {
    let raw = required(field, value)?;
    NaiveTime::parse_from_str(&raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
        .map_err(|_| FormError::Invalid {
            field,
            value: raw,
            expected: "a time as HH:MM",
        })
}

/// Render a time for a form field; seconds only when set.
pub fn format_time(time: NaiveTime) -> String {
    if time.second() == 0 {
        time.format("%H:%M").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}

/// Parse a calendar date as `YYYY-MM-DD`.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, FormError> {
    let raw = required(field, value)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| FormError::Invalid {
        field,
        value: raw,
        expected: "a date as YYYY-MM-DD",
    })
}

/// First journey date the booking form offers: the day after `today`.
pub fn earliest_journey_date(today: NaiveDate) -> NaiveDate {
    today.checked_add_days(Days::new(1)).unwrap_or(today)
}

/// Login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginDraft {
    /// Login name
    pub username: String,
    /// Password
    pub password: String,
}

impl LoginDraft {
    /// Coerce into login credentials. The password is not trimmed.
    pub fn to_credentials(&self) -> Result<Credentials, FormError> {
        let username = required("Username", &self.username)?;
        if self.password.is_empty() {
            return Err(FormError::Missing { field: "Password" });
        }
        Ok(Credentials {
            username,
            password: self.password.clone(),
        })
    }
}

/// Registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterDraft {
    /// Contact address
    pub email: String,
    /// Login name
    pub username: String,
    /// Optional display name
    pub full_name: String,
    /// Password
    pub password: String,
    /// Register through the admin endpoint
    pub as_admin: bool,
}

impl RegisterDraft {
    /// Coerce into a registration payload.
    pub fn to_new_user(&self) -> Result<NewUser, FormError> {
        let email = required("Email", &self.email)?;
        let username = required("Username", &self.username)?;
        if self.password.is_empty() {
            return Err(FormError::Missing { field: "Password" });
        }
        Ok(NewUser {
            email,
            username,
            password: self.password.clone(),
            full_name: optional(&self.full_name),
        })
    }
}

/// Station form used for both create and edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationDraft {
    /// Station name
    pub name: String,
    /// Station code
    pub code: String,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
}

impl LocationDraft {
    /// Pre-fill the form from an existing station.
    pub fn from_location(location: &Location) -> Self {
        Self {
            name: location.name.clone(),
            code: location.code.clone(),
            city: location.city.clone(),
            state: location.state.clone(),
        }
    }

    /// Coerce into a create payload.
    pub fn to_new_location(&self) -> Result<NewLocation, FormError> {
        Ok(NewLocation {
            name: required("Station name", &self.name)?,
            code: required("Station code", &self.code)?,
            city: required("City", &self.city)?,
            state: required("State", &self.state)?,
        })
    }

    /// Coerce into an update payload carrying every field.
    pub fn to_update(&self) -> Result<LocationUpdate, FormError> {
        let full = self.to_new_location()?;
        Ok(LocationUpdate {
            name: Some(full.name),
            code: Some(full.code),
            city: Some(full.city),
            state: Some(full.state),
        })
    }
}

/// Train schedule form used for both create and edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainDraft {
    /// Public train number
    pub train_number: String,
    /// Train name
    pub train_name: String,
    /// Origin station id
    pub source_id: String,
    /// Terminus station id
    pub destination_id: String,
    /// Departure time
    pub departure_time: String,
    /// Arrival time
    pub arrival_time: String,
    /// Seat capacity
    pub total_seats: String,
    /// Fare per seat
    pub fare: String,
}

impl TrainDraft {
    /// Pre-fill the form from an existing train.
    pub fn from_train(train: &Train) -> Self {
        Self {
            train_number: train.train_number.clone(),
            train_name: train.train_name.clone(),
            source_id: train.source_id.to_string(),
            destination_id: train.destination_id.to_string(),
            departure_time: format_time(train.departure_time),
            arrival_time: format_time(train.arrival_time),
            total_seats: train.total_seats.to_string(),
            fare: train.fare.to_string(),
        }
    }

    /// Coerce into a create payload.
    pub fn to_new_train(&self) -> Result<NewTrain, FormError> {
        Ok(NewTrain {
            train_number: required("Train number", &self.train_number)?,
            train_name: required("Train name", &self.train_name)?,
            source_id: parse_number("Source station", &self.source_id)?,
            destination_id: parse_number("Destination station", &self.destination_id)?,
            departure_time: parse_time("Departure time", &self.departure_time)?,
            arrival_time: parse_time("Arrival time", &self.arrival_time)?,
            total_seats: parse_bounded("Total seats", &self.total_seats, 1, i32::MAX as i64)?
                as i32,
            fare: parse_bounded("Fare", &self.fare, 1, i64::MAX)?,
        })
    }

    /// Coerce into an update payload carrying every field.
    pub fn to_update(&self) -> Result<TrainUpdate, FormError> {
        let full = self.to_new_train()?;
        Ok(TrainUpdate {
            train_number: Some(full.train_number),
            train_name: Some(full.train_name),
            source_id: Some(full.source_id),
            destination_id: Some(full.destination_id),
            departure_time: Some(full.departure_time),
            arrival_time: Some(full.arrival_time),
            total_seats: Some(full.total_seats),
            fare: Some(full.fare),
        })
    }
}

/// Passenger form for a selected train.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    /// Passenger name
    pub passenger_name: String,
    /// Passenger age
    pub passenger_age: String,
    /// Passenger gender
    pub passenger_gender: String,
    /// Day of travel
    pub journey_date: String,
}

impl BookingDraft {
    /// Coerce into a booking payload for `train_id`.
    ///
    /// `today` anchors the earliest selectable journey date.
    pub fn to_new_booking(&self, train_id: i64, today: NaiveDate) -> Result<NewBooking, FormError> {
        let passenger_name = required("Passenger name", &self.passenger_name)?;
        let passenger_age = parse_bounded(
            "Age",
            &self.passenger_age,
            MIN_PASSENGER_AGE,
            MAX_PASSENGER_AGE,
        )? as i32;
        let passenger_gender = required("Gender", &self.passenger_gender)?;
        let journey_date = parse_date("Journey date", &self.journey_date)?;

        let earliest = earliest_journey_date(today);
        if journey_date < earliest {
            return Err(FormError::DateTooEarly {
                field: "Journey date",
                earliest,
            });
        }

        Ok(NewBooking {
            train_id,
            journey_date,
            passenger_name,
            passenger_age,
            passenger_gender,
        })
    }
}
