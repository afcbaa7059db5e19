//! The logged-in user's bookings.

use std::time::Instant;

use railbook_client::BookingApi;
use railbook_core::lookup::{join_bookings, BookingDetails};
use railbook_core::models::{Booking, Location, Train};
use tracing::{info, warn};

use crate::feedback::{Confirmation, Feedback};
use crate::form::step;

/// Bookings list with cancellation
#[derive(Debug, Clone, Default)]
pub struct MyBookingsView {
    /// The user's bookings
    pub bookings: Vec<Booking>,
    /// Trains for the id join
    pub trains: Vec<Train>,
    /// Stations for the id join
    pub locations: Vec<Location>,
    /// Highlighted row
    pub selected: usize,
    /// Pending cancellation, keyed by booking id
    pub confirm: Option<Confirmation<i64>>,
    /// Error and success line
    pub feedback: Feedback,
    /// Initial load in flight
    pub loading: bool,
}

impl MyBookingsView {
    /// Fetch bookings, trains and stations together; render only when all arrive
    pub async fn load(&mut self, api: &dyn BookingApi) {
        self.loading = true;
        let result = tokio::try_join!(api.my_bookings(), api.list_trains(), api.list_locations());
        self.loading = false;

        match result {
            Ok((bookings, trains, locations)) => {
                self.bookings = bookings;
                self.trains = trains;
                self.locations = locations;
                self.selected = self.selected.min(self.bookings.len().saturating_sub(1));
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch bookings");
                self.feedback.fail(e.message_or("Failed to fetch bookings"));
            }
        }
    }

    /// Bookings joined to their trains and stations
    pub fn rows(&self) -> Vec<BookingDetails<'_>> {
        join_bookings(&self.bookings, &self.trains, &self.locations)
    }

    /// Move the highlight
    pub fn select(&mut self, forward: bool) {
        self.selected = step(self.selected, self.bookings.len(), forward);
    }

    /// Ask before cancelling the highlighted booking
    pub fn request_cancel(&mut self) {
        if let Some(booking) = self.bookings.get(self.selected) {
            if booking.status.is_cancellable() {
                self.confirm = Some(Confirmation::new(
                    format!(
                        "Are you sure you want to cancel booking {}?",
                        booking.booking_reference
                    ),
                    booking.id,
                ));
            }
        }
    }

    /// Answer the pending prompt. Declining makes no request.
    pub async fn resolve_confirmation(&mut self, api: &dyn BookingApi, accepted: bool, now: Instant) {
        let Some(confirm) = self.confirm.take() else {
            return;
        };
        if !accepted {
            return;
        }

        self.feedback.clear();
        match api.cancel_booking(confirm.action).await {
            Ok(receipt) => {
                info!(reference = %receipt.booking_reference, "booking cancelled");
                self.feedback.succeed("Booking cancelled successfully!", now);
                self.load(api).await;
            }
            Err(e) => {
                warn!(error = %e, booking_id = confirm.action, "cancel failed");
                self.feedback.fail(e.message_or("Failed to cancel booking"));
            }
        }
    }

    /// Expire the success message
    pub fn tick(&mut self, now: Instant) {
        self.feedback.tick(now);
    }
}
