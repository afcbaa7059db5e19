use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A scheduled train between two stations.
///
/// `available_seats` is owned by the backend; the client only displays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Train {
    /// Backend identifier
    pub id: i64,
    /// Public train number, e.g. `12345`
    pub train_number: String,
    /// Train name, e.g. `Shatabdi Express`
    pub train_name: String,
    /// Origin station id
    pub source_id: i64,
    /// Terminus station id
    pub destination_id: i64,
    /// Scheduled departure
    pub departure_time: NaiveTime,
    /// Scheduled arrival
    pub arrival_time: NaiveTime,
    /// Seat capacity
    pub total_seats: i32,
    /// Seats not yet booked
    pub available_seats: i32,
    /// Fare per seat in whole currency units
    pub fare: i64,
    /// Server timestamp, kept verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Train {
    /// True when no seat can be booked.
    pub fn is_sold_out(&self) -> bool {
        self.available_seats <= 0
    }

    /// `available/total` seat summary.
    pub fn seat_summary(&self) -> String {
        format!("{}/{}", self.available_seats, self.total_seats)
    }

    /// `HH:MM - HH:MM` schedule summary.
    pub fn schedule(&self) -> String {
        format!(
            "{} - {}",
            self.departure_time.format("%H:%M"),
            self.arrival_time.format("%H:%M")
        )
    }
}

/// Payload for `POST /trains/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTrain {
    /// Public train number
    pub train_number: String,
    /// Train name
    pub train_name: String,
    /// Origin station id
    pub source_id: i64,
    /// Terminus station id
    pub destination_id: i64,
    /// Scheduled departure
    pub departure_time: NaiveTime,
    /// Scheduled arrival
    pub arrival_time: NaiveTime,
    /// Seat capacity
    pub total_seats: i32,
    /// Fare per seat
    pub fare: i64,
}

/// Payload for `PUT /trains/:id`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrainUpdate {
    /// New train number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub train_number: Option<String>,
    /// New train name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub train_name: Option<String>,
    /// New origin station id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<i64>,
    /// New terminus station id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<i64>,
    /// New departure time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<NaiveTime>,
    /// New arrival time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<NaiveTime>,
    /// New capacity; the backend rebalances available seats
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_seats: Option<i32>,
    /// New fare
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fare: Option<i64>,
}

/// Query for `GET /trains/search`.
///
/// Only the parameters that are set are sent; an unset parameter does not
/// constrain the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrainQuery {
    /// Required origin station, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<i64>,
    /// Required terminus station, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<i64>,
}

impl TrainQuery {
    /// Query string pairs for the set parameters, in a stable order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(id) = self.source_id {
            params.push(("source_id", id.to_string()));
        }
        if let Some(id) = self.destination_id {
            params.push(("destination_id", id.to_string()));
        }
        params
    }

    /// Whether `train` satisfies every set parameter.
    pub fn matches(&self, train: &Train) -> bool {
        self.source_id.map_or(true, |id| train.source_id == id)
            && self.destination_id.map_or(true, |id| train.destination_id == id)
    }
}
