//! Station management (admin).

use std::time::Instant;

use railbook_client::BookingApi;
use railbook_core::forms::LocationDraft;
use railbook_core::models::Location;
use tracing::{info, warn};

use crate::feedback::{Confirmation, Feedback};
use crate::form::{step, Field, FormState};

const NAME: usize = 0;
const CODE: usize = 1;
const CITY: usize = 2;
const STATE: usize = 3;

/// Station list with add, edit and delete
#[derive(Debug, Clone)]
pub struct LocationManager {
    /// All stations
    pub locations: Vec<Location>,
    /// Add/edit form
    pub form: FormState,
    /// Station being edited, if any
    pub editing: Option<i64>,
    /// Highlighted row
    pub selected: usize,
    /// Pending delete, keyed by station id
    pub confirm: Option<Confirmation<i64>>,
    /// Error and success line
    pub feedback: Feedback,
    /// Load in flight
    pub loading: bool,
}

impl Default for LocationManager {
    fn default() -> Self {
        Self {
            locations: Vec::new(),
            form: FormState::new(vec![
                Field::text("Station Name"),
                Field::text("Station Code"),
                Field::text("City"),
                Field::text("State"),
            ]),
            editing: None,
            selected: 0,
            confirm: None,
            feedback: Feedback::default(),
            loading: false,
        }
    }
}

impl LocationManager {
    /// Fetch the station list
    pub async fn load(&mut self, api: &dyn BookingApi) {
        self.loading = true;
        let result = api.list_locations().await;
        self.loading = false;

        match result {
            Ok(locations) => {
                self.locations = locations;
                self.selected = self.selected.min(self.locations.len().saturating_sub(1));
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch locations");
                self.feedback.fail(e.message_or("Failed to fetch locations"));
            }
        }
    }

    fn draft(&self) -> LocationDraft {
        LocationDraft {
            name: self.form.value(NAME).to_string(),
            code: self.form.value(CODE).to_string(),
            city: self.form.value(CITY).to_string(),
            state: self.form.value(STATE).to_string(),
        }
    }

    /// Create a station, or update the one being edited
    pub async fn submit(&mut self, api: &dyn BookingApi, now: Instant) {
        self.feedback.clear();
        let draft = self.draft();

        let result = match self.editing {
            Some(id) => match draft.to_update() {
                Ok(update) => api
                    .update_location(id, &update)
                    .await
                    .map_err(|e| e.message_or("Failed to update location")),
                Err(e) => Err(e.to_string()),
            },
            None => match draft.to_new_location() {
                Ok(location) => api
                    .create_location(&location)
                    .await
                    .map_err(|e| e.message_or("Failed to add location")),
                Err(e) => Err(e.to_string()),
            },
        };

        match result {
            Ok(saved) => {
                let message = if self.editing.is_some() {
                    "Location updated successfully!"
                } else {
                    "Location added successfully!"
                };
                info!(id = saved.id, code = %saved.code, "location saved");
                self.form.reset();
                self.editing = None;
                self.feedback.succeed(message, now);
                self.load(api).await;
            }
            Err(message) => {
                warn!(%message, "location not saved");
                self.feedback.fail(message);
            }
        }
    }

    /// Fill the form from the highlighted station
    pub fn begin_edit(&mut self) {
        if let Some(location) = self.locations.get(self.selected) {
            let draft = LocationDraft::from_location(location);
            self.form.set_value(NAME, draft.name);
            self.form.set_value(CODE, draft.code);
            self.form.set_value(CITY, draft.city);
            self.form.set_value(STATE, draft.state);
            self.editing = Some(location.id);
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
        self.selected = step(self.selected, self.locations.len(), forward);
    }

    /// Ask before deleting the highlighted station
    pub fn request_delete(&mut self) {
        if let Some(location) = self.locations.get(self.selected) {
            self.confirm = Some(Confirmation::new(
                "Are you sure you want to delete this location?",
                location.id,
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
        match api.delete_location(confirm.action).await {
            Ok(()) => {
                info!(id = confirm.action, "location deleted");
                if self.editing == Some(confirm.action) {
                    self.cancel_edit();
                }
                self.feedback.succeed("Location deleted successfully!", now);
                self.load(api).await;
            }
            Err(e) => {
                warn!(error = %e, id = confirm.action, "location delete failed");
                self.feedback.fail(e.message_or("Failed to delete location"));
            }
        }
    }

    /// Expire the success message
    pub fn tick(&mut self, now: Instant) {
        self.feedback.tick(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, ADMIN_TOKEN};
    use railbook_client::MemoryStorage;
    use std::sync::Arc;
    use std::time::Duration;

    fn api() -> FakeApi {
        FakeApi::new(Arc::new(MemoryStorage::with_token(ADMIN_TOKEN)))
    }

    fn fill(view: &mut LocationManager, name: &str, code: &str) {
        view.form.set_value(NAME, name);
        view.form.set_value(CODE, code);
        view.form.set_value(CITY, "Hubballi");
        view.form.set_value(STATE, "Karnataka");
    }

    #[tokio::test]
    async fn test_add_refreshes_and_clears_message() {
        let api = api();
        let mut view = LocationManager::default();
        view.load(&api).await;
        assert_eq!(view.locations.len(), 3);

        let now = Instant::now();
        fill(&mut view, "Hubballi Junction", "UBL");
        view.submit(&api, now).await;

        assert_eq!(view.feedback.success(), Some("Location added successfully!"));
        assert_eq!(view.locations.len(), 4);
        assert_eq!(view.form.value(NAME), "");
        assert_eq!(api.calls_to("list_locations"), 2);

        view.tick(now + Duration::from_secs(3));
        assert_eq!(view.feedback.success(), None);
    }

    #[tokio::test]
    async fn test_duplicate_code_detail() {
        let api = api();
        let mut view = LocationManager::default();
        view.load(&api).await;

        fill(&mut view, "Chennai Egmore", "MAS");
        view.submit(&api, Instant::now()).await;
        assert_eq!(view.feedback.error(), Some("Location code already exists"));
        assert_eq!(view.form.value(CODE), "MAS");
    }

    #[tokio::test]
    async fn test_edit_updates_in_place() {
        let api = api();
        let mut view = LocationManager::default();
        view.load(&api).await;

        view.select(true);
        view.begin_edit();
        assert_eq!(view.editing, Some(2));
        assert_eq!(view.form.value(CODE), "MAS");

        view.form.set_value(NAME, "Puratchi Thalaivar Dr. M.G. Ramachandran Central");
        view.submit(&api, Instant::now()).await;

        assert_eq!(view.feedback.success(), Some("Location updated successfully!"));
        assert_eq!(view.editing, None);
        assert_eq!(api.calls_to("update_location"), 1);
        assert!(view.locations[1].name.starts_with("Puratchi"));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let api = api();
        let mut view = LocationManager::default();
        view.load(&api).await;

        view.request_delete();
        view.resolve_confirmation(&api, false, Instant::now()).await;
        assert_eq!(api.calls_to("delete_location"), 0);
        assert_eq!(api.locations().len(), 3);

        view.request_delete();
        view.resolve_confirmation(&api, true, Instant::now()).await;
        assert_eq!(api.calls_to("delete_location"), 1);
        assert_eq!(view.locations.len(), 2);
        assert_eq!(view.feedback.success(), Some("Location deleted successfully!"));
    }

    #[tokio::test]
    async fn test_delete_failure_fallback() {
        let api = api();
        api.fail("delete_location", 500, None);
        let mut view = LocationManager::default();
        view.load(&api).await;

        view.request_delete();
        view.resolve_confirmation(&api, true, Instant::now()).await;
        assert_eq!(view.feedback.error(), Some("Failed to delete location"));
    }
}
