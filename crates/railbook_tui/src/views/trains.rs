//! Train schedule management (admin).

use std::time::Instant;

use railbook_client::BookingApi;
use railbook_core::forms::TrainDraft;
use railbook_core::lookup::location_label;
use railbook_core::models::{Location, Train};
use tracing::{info, warn};

use crate::feedback::{Confirmation, Feedback};
use crate::form::{step, Choice, Field, FormState};

const NUMBER: usize = 0;
const NAME: usize = 1;
const SOURCE: usize = 2;
const DESTINATION: usize = 3;
const DEPARTURE: usize = 4;
const ARRIVAL: usize = 5;
const TOTAL_SEATS: usize = 6;
const FARE: usize = 7;

/// Train list with add, edit and delete
#[derive(Debug, Clone)]
pub struct TrainManager {
    /// All trains
    pub trains: Vec<Train>,
    /// Stations for labels and the station selections
    pub locations: Vec<Location>,
    /// Add/edit form
    pub form: FormState,
    /// Train being edited, if any
    pub editing: Option<i64>,
    /// Highlighted row
    pub selected: usize,
    /// Pending delete, keyed by train id
    pub confirm: Option<Confirmation<i64>>,
    /// Error and success line
    pub feedback: Feedback,
    /// Load in flight
    pub loading: bool,
}

fn station_choices(locations: &[Location]) -> Vec<Choice> {
    std::iter::once(Choice::new("", "Select station"))
        .chain(
            locations
                .iter()
                .map(|l| Choice::new(l.id.to_string(), l.label())),
        )
        .collect()
}

impl Default for TrainManager {
    fn default() -> Self {
        Self {
            trains: Vec::new(),
            locations: Vec::new(),
            form: FormState::new(vec![
                Field::text("Train Number"),
                Field::text("Train Name"),
                Field::select("Source", station_choices(&[])),
                Field::select("Destination", station_choices(&[])),
                Field::text("Departure (HH:MM)"),
                Field::text("Arrival (HH:MM)"),
                Field::text("Total Seats"),
                Field::text("Fare"),
            ]),
            editing: None,
            selected: 0,
            confirm: None,
            feedback: Feedback::default(),
            loading: false,
        }
    }
}

impl TrainManager {
    /// Fetch trains and stations concurrently
    pub async fn load(&mut self, api: &dyn BookingApi) {
        self.loading = true;
        let (trains, locations) = tokio::join!(api.list_trains(), api.list_locations());
        self.loading = false;

        match trains {
            Ok(trains) => {
                self.trains = trains;
                self.selected = self.selected.min(self.trains.len().saturating_sub(1));
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch trains");
                self.feedback.fail(e.message_or("Failed to fetch trains"));
            }
        }

        match locations {
            Ok(locations) => {
                self.form.set_choices(SOURCE, station_choices(&locations));
                self.form.set_choices(DESTINATION, station_choices(&locations));
                self.locations = locations;
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch locations");
                self.feedback.fail(e.message_or("Failed to fetch locations"));
            }
        }
    }

    /// Station label for an id
    pub fn station(&self, id: i64) -> String {
        location_label(&self.locations, id)
    }

    fn draft(&self) -> TrainDraft {
        TrainDraft {
            train_number: self.form.value(NUMBER).to_string(),
            train_name: self.form.value(NAME).to_string(),
            source_id: self.form.value(SOURCE).to_string(),
            destination_id: self.form.value(DESTINATION).to_string(),
            departure_time: self.form.value(DEPARTURE).to_string(),
            arrival_time: self.form.value(ARRIVAL).to_string(),
            total_seats: self.form.value(TOTAL_SEATS).to_string(),
            fare: self.form.value(FARE).to_string(),
        }
    }

    /// Create a train, or update the one being edited
    pub async fn submit(&mut self, api: &dyn BookingApi, now: Instant) {
        self.feedback.clear();
        let draft = self.draft();

        let result = match self.editing {
            Some(id) => match draft.to_update() {
                Ok(update) => api
                    .update_train(id, &update)
                    .await
                    .map_err(|e| e.message_or("Failed to update train")),
                Err(e) => Err(e.to_string()),
            },
            None => match draft.to_new_train() {
                Ok(train) => api
                    .create_train(&train)
                    .await
                    .map_err(|e| e.message_or("Failed to add train")),
                Err(e) => Err(e.to_string()),
            },
        };

        match result {
            Ok(saved) => {
                let message = if self.editing.is_some() {
                    "Train updated successfully!"
                } else {
                    "Train added successfully!"
                };
                info!(id = saved.id, number = %saved.train_number, "train saved");
                self.form.reset();
                self.editing = None;
                self.feedback.succeed(message, now);
                self.load(api).await;
            }
            Err(message) => {
                warn!(%message, "train not saved");
                self.feedback.fail(message);
            }
        }
    }

    /// Fill the form from the highlighted train
    pub fn begin_edit(&mut self) {
        if let Some(train) = self.trains.get(self.selected) {
            let draft = TrainDraft::from_train(train);
            self.form.set_value(NUMBER, draft.train_number);
            self.form.set_value(NAME, draft.train_name);
            self.form.set_value(SOURCE, draft.source_id);
            self.form.set_value(DESTINATION, draft.destination_id);
            self.form.set_value(DEPARTURE, draft.departure_time);
            self.form.set_value(ARRIVAL, draft.arrival_time);
            self.form.set_value(TOTAL_SEATS, draft.total_seats);
            self.form.set_value(FARE, draft.fare);
            self.editing = Some(train.id);
            self.feedback.clear();
        }
    }

    /// Leave edit mode and clear the form
    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.form.reset();
    }

    /// Move the highlight
    pub fn select(&mut self, forward: bool) {
        self.selected = step(self.selected, self.trains.len(), forward);
    }

    /// Ask before deleting the highlighted train
    pub fn request_delete(&mut self) {
        if let Some(train) = self.trains.get(self.selected) {
            self.confirm = Some(Confirmation::new(
                "Are you sure you want to delete this train?",
                train.id,
            ));
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
        match api.delete_train(confirm.action).await {
            Ok(()) => {
                info!(id = confirm.action, "train deleted");
                if self.editing == Some(confirm.action) {
                    self.cancel_edit();
                }
                self.feedback.succeed("Train deleted successfully!", now);
                self.load(api).await;
            }
            Err(e) => {
                warn!(error = %e, id = confirm.action, "train delete failed");
                self.feedback.fail(e.message_or("Failed to delete train"));
            }
        }
    }

    /// Expire the success message
    pub fn tick(&mut self, now: Instant) {
        self.feedback.tick(now);
    }
}
