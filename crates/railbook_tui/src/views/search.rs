//! Train search view.

use railbook_client::BookingApi;
use railbook_core::forms::parse_optional_id;
use railbook_core::lookup::location_label;
use railbook_core::models::{Location, Train, TrainQuery};
use railbook_core::FormError;
use tracing::{debug, warn};

use crate::feedback::Feedback;
use crate::form::{step, Choice, Field, FormState};
use crate::views::Outcome;

const FROM: usize = 0;
const TO: usize = 1;

/// Search form and results
#[derive(Debug, Clone)]
pub struct SearchView {
    /// Optional origin and terminus selections
    pub form: FormState,
    /// Stations offered in the selections
    pub locations: Vec<Location>,
    /// Last search result
    pub trains: Vec<Train>,
    /// Whether a search has completed
    pub searched: bool,
    /// Highlighted result row
    pub selected: usize,
    /// Error line
    pub feedback: Feedback,
    /// Request in flight
    pub loading: bool,
}

impl Default for SearchView {
    fn default() -> Self {
        Self {
            form: FormState::new(vec![
                Field::select("From", station_choices(&[])),
                Field::select("To", station_choices(&[])),
            ]),
            locations: Vec::new(),
            trains: Vec::new(),
            searched: false,
            selected: 0,
            feedback: Feedback::default(),
            loading: false,
        }
    }
}

/// `Any` followed by every station
fn station_choices(locations: &[Location]) -> Vec<Choice> {
    std::iter::once(Choice::new("", "Any"))
        .chain(
            locations
                .iter()
                .map(|l| Choice::new(l.id.to_string(), l.label())),
        )
        .collect()
}

impl SearchView {
    /// Fetch the stations for the selections
    pub async fn load(&mut self, api: &dyn BookingApi) {
        match api.list_locations().await {
            Ok(locations) => {
                self.form.set_choices(FROM, station_choices(&locations));
                self.form.set_choices(TO, station_choices(&locations));
                self.locations = locations;
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch locations");
                self.feedback.fail(e.message_or("Failed to fetch locations"));
            }
        }
    }

    /// Query for the current selections
    pub fn query(&self) -> Result<TrainQuery, FormError> {
        Ok(TrainQuery {
            source_id: parse_optional_id("From", self.form.value(FROM))?,
            destination_id: parse_optional_id("To", self.form.value(TO))?,
        })
    }

    /// Run the search with only the selected parameters
    pub async fn search(&mut self, api: &dyn BookingApi) {
        self.feedback.clear();
        let query = match self.query() {
            Ok(q) => q,
            Err(e) => {
                self.feedback.fail(e.to_string());
                return;
            }
        };

        self.loading = true;
        let result = api.search_trains(&query).await;
        self.loading = false;
        self.searched = true;
        self.selected = 0;

        match result {
            Ok(trains) => {
                debug!(?query, found = trains.len(), "train search");
                self.trains = trains;
            }
            Err(e) => {
                warn!(error = %e, "train search failed");
                self.trains.clear();
                self.feedback.fail(e.message_or("Failed to search trains"));
            }
        }
    }

    /// `N Train(s) Found`
    pub fn result_heading(&self) -> String {
        format!("{} Train(s) Found", self.trains.len())
    }

    /// Station label for an id in the loaded list
    pub fn station(&self, id: i64) -> String {
        location_label(&self.locations, id)
    }

    /// Move the highlight
    pub fn select(&mut self, forward: bool) {
        self.selected = step(self.selected, self.trains.len(), forward);
    }

    /// Open the booking form for the highlighted train
    pub fn book_selected(&mut self) -> Outcome {
        match self.trains.get(self.selected) {
            Some(train) if train.is_sold_out() => {
                self.feedback.fail("Sold Out");
                Outcome::Stay
            }
            Some(train) => Outcome::Book(train.clone()),
            None => Outcome::Stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use railbook_client::MemoryStorage;
    use std::sync::Arc;

    async fn loaded(api: &FakeApi) -> SearchView {
        let mut view = SearchView::default();
        view.load(api).await;
        view
    }

    #[tokio::test]
    async fn test_both_stations_filter_on_both() {
        let api = FakeApi::new(Arc::new(MemoryStorage::new()));
        let mut view = loaded(&api).await;
        view.form.set_value(FROM, "1");
        view.form.set_value(TO, "2");

        view.search(&api).await;
        assert_eq!(view.result_heading(), "1 Train(s) Found");
        assert!(view
            .trains
            .iter()
            .all(|t| t.source_id == 1 && t.destination_id == 2));
        assert_eq!(
            api.search_queries(),
            vec![TrainQuery {
                source_id: Some(1),
                destination_id: Some(2)
            }]
        );
    }

    #[tokio::test]
    async fn test_unset_station_is_not_sent() {
        let api = FakeApi::new(Arc::new(MemoryStorage::new()));
        let mut view = loaded(&api).await;
        view.form.set_value(TO, "2");

        view.search(&api).await;
        assert_eq!(view.trains.len(), 2);
        assert!(view.trains.iter().all(|t| t.destination_id == 2));
        assert_eq!(
            api.search_queries()[0],
            TrainQuery {
                source_id: None,
                destination_id: Some(2)
            }
        );
    }

    #[tokio::test]
    async fn test_station_labels_fall_back_to_unknown() {
        let api = FakeApi::new(Arc::new(MemoryStorage::new()));
        let view = loaded(&api).await;
        assert_eq!(view.station(2), "Chennai Central (MAS)");
        assert_eq!(view.station(99), "Unknown");
        assert_eq!(view.form.fields()[FROM].display(), "< Any >");
    }

    #[tokio::test]
    async fn test_sold_out_train_cannot_be_booked() {
        let api = FakeApi::new(Arc::new(MemoryStorage::new()));
        let mut view = loaded(&api).await;
        view.form.set_value(FROM, "3");
        view.search(&api).await;

        assert_eq!(view.book_selected(), Outcome::Stay);
        assert_eq!(view.feedback.error(), Some("Sold Out"));
    }

    #[tokio::test]
    async fn test_booking_carries_the_train() {
        let api = FakeApi::new(Arc::new(MemoryStorage::new()));
        let mut view = loaded(&api).await;
        view.search(&api).await;
        view.select(true);

        match view.book_selected() {
            Outcome::Book(train) => assert_eq!(train.id, 2),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_failure_message() {
        let api = FakeApi::new(Arc::new(MemoryStorage::new()));
        api.fail("search_trains", 503, None);
        let mut view = loaded(&api).await;
        view.search(&api).await;
        assert_eq!(view.feedback.error(), Some("Failed to search trains"));

        api.fail("list_locations", 500, Some("Database unavailable"));
        view.load(&api).await;
        assert_eq!(view.feedback.error(), Some("Database unavailable"));
    }
}
