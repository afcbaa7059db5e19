//! Booking form for the train picked in search.

use chrono::NaiveDate;
use railbook_client::BookingApi;
use railbook_core::forms::{earliest_journey_date, BookingDraft};
use railbook_core::models::{Train, GENDER_OPTIONS};
use tracing::{info, warn};

use crate::feedback::Feedback;
use crate::form::{Choice, Field, FormState};
use crate::router::Route;
use crate::views::Outcome;

const PASSENGER_NAME: usize = 0;
const AGE: usize = 1;
const GENDER: usize = 2;
const JOURNEY_DATE: usize = 3;

/// Passenger form state
#[derive(Debug, Clone)]
pub struct BookingView {
    /// Train carried over from search
    pub train: Option<Train>,
    /// Passenger fields
    pub form: FormState,
    /// Error line
    pub feedback: Feedback,
    /// Request in flight
    pub loading: bool,
}

impl BookingView {
    /// Form for `train`; the journey date starts at the earliest allowed day
    pub fn new(train: Option<Train>, today: NaiveDate) -> Self {
        let genders = GENDER_OPTIONS
            .iter()
            .map(|g| Choice::new(*g, *g))
            .collect();
        let mut form = FormState::new(vec![
            Field::text("Passenger Name"),
            Field::text("Age"),
            Field::select("Gender", genders),
            Field::text("Journey Date (YYYY-MM-DD)"),
        ]);
        form.set_value(
            JOURNEY_DATE,
            earliest_journey_date(today).format("%Y-%m-%d").to_string(),
        );

        Self {
            train,
            form,
            feedback: Feedback::default(),
            loading: false,
        }
    }

    /// Submit button text
    pub fn submit_label(&self) -> String {
        match &self.train {
            Some(train) => format!("Pay ₹{} & Confirm", train.fare),
            None => "Confirm".to_string(),
        }
    }

    fn draft(&self) -> BookingDraft {
        BookingDraft {
            passenger_name: self.form.value(PASSENGER_NAME).to_string(),
            passenger_age: self.form.value(AGE).to_string(),
            passenger_gender: self.form.value(GENDER).to_string(),
            journey_date: self.form.value(JOURNEY_DATE).to_string(),
        }
    }

    /// Book a seat; without a train the user is sent back to search
    pub async fn submit(&mut self, api: &dyn BookingApi, today: NaiveDate) -> Outcome {
        let train_id = match &self.train {
            Some(train) => train.id,
            None => return Outcome::go(Route::Search),
        };

        self.feedback.clear();
        let booking = match self.draft().to_new_booking(train_id, today) {
            Ok(b) => b,
            Err(e) => {
                self.feedback.fail(e.to_string());
                return Outcome::Stay;
            }
        };

        self.loading = true;
        let result = api.create_booking(&booking).await;
        self.loading = false;

        match result {
            Ok(created) => {
                info!(
                    reference = %created.booking_reference,
                    train_id,
                    "booking confirmed"
                );
                Outcome::go_with(
                    Route::MyBookings,
                    format!(
                        "Booking Successful! Booking Reference: {}, Seat Number: {}",
                        created.booking_reference,
                        created.seat_number.as_deref().unwrap_or("-")
                    ),
                )
            }
            Err(e) => {
                warn!(error = %e, train_id, "booking failed");
                self.feedback.fail(e.message_or("Booking failed"));
                Outcome::Stay
            }
        }
    }

    /// Abandon the form
    pub fn cancel(&self) -> Outcome {
        Outcome::go(Route::Search)
    }
}
