//! Id joins between independently fetched collections.
//!
//! The backend returns bookings, trains and locations as flat lists that
//! reference each other by id. Views join them here with linear lookups.

use crate::models::{Booking, Location, Train};

/// Label shown when a referenced station is not in the fetched list.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// Find a station by id.
pub fn find_location(locations: &[Location], id: i64) -> Option<&Location> {
    locations.iter().find(|loc| loc.id == id)
}

/// `Name (CODE)` for a station id, or `Unknown`.
pub fn location_label(locations: &[Location], id: i64) -> String {
    find_location(locations, id)
        .map(Location::label)
        .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
}

/// Find a train by id.
pub fn find_train(trains: &[Train], id: i64) -> Option<&Train> {
    trains.iter().find(|train| train.id == id)
}

/// A booking joined with its train and the train's stations.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDetails<'a> {
    /// The booking itself
    pub booking: &'a Booking,
    /// Its train, when still listed
    pub train: Option<&'a Train>,
    /// Origin label
    pub source: String,
    /// Terminus label
    pub destination: String,
}

impl BookingDetails<'_> {
    /// `source → destination` route label.
    pub fn route(&self) -> String {
        format!("{} → {}", self.source, self.destination)
    }

    /// `Name (#number)` train label, or `Unknown` when the train is gone.
    pub fn train_label(&self) -> String {
        self.train
            .map(|t| format!("{} (#{})", t.train_name, t.train_number))
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
    }
}

/// Join every booking to its train and stations, preserving booking order.
pub fn join_bookings<'a>(
    bookings: &'a [Booking],
    trains: &'a [Train],
    locations: &'a [Location],
) -> Vec<BookingDetails<'a>> {
    bookings
        .iter()
        .map(|booking| {
            let train = find_train(trains, booking.train_id);
            let (source, destination) = match train {
                Some(t) => (
                    location_label(locations, t.source_id),
                    location_label(locations, t.destination_id),
                ),
                None => (UNKNOWN_LOCATION.to_string(), UNKNOWN_LOCATION.to_string()),
            };
            BookingDetails {
                booking,
                train,
                source,
                destination,
            }
        })
        .collect()
}
