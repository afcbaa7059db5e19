//! Admin dashboard: station and train managers plus read-only lists.

use std::time::Instant;

use railbook_client::BookingApi;
use railbook_core::lookup::{join_bookings, BookingDetails};
use railbook_core::models::{Booking, Location, Train, User};
use tracing::warn;

use crate::feedback::Feedback;
use crate::form::step;
use crate::views::locations::LocationManager;
use crate::views::trains::TrainManager;

/// Dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminTab {
    /// Station management
    #[default]
    Locations,
    /// Train management
    Trains,
    /// Every booking in the system
    Bookings,
    /// Registered accounts
    Users,
}

impl AdminTab {
    /// Tabs in display order
    pub const ALL: [AdminTab; 4] = [
        AdminTab::Locations,
        AdminTab::Trains,
        AdminTab::Bookings,
        AdminTab::Users,
    ];

    /// Tab label
    pub fn title(&self) -> &'static str {
        match self {
            Self::Locations => "Manage Locations",
            Self::Trains => "Manage Trains",
            Self::Bookings => "All Bookings",
            Self::Users => "Users",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    /// Neighbouring tab, wrapping
    pub fn cycle(&self, forward: bool) -> AdminTab {
        let len = Self::ALL.len();
        let i = self.index();
        let next = if forward { (i + 1) % len } else { (i + len - 1) % len };
        Self::ALL[next]
    }
}

/// Every booking joined to trains and stations
#[derive(Debug, Clone, Default)]
pub struct AllBookings {
    /// All bookings
    pub bookings: Vec<Booking>,
    /// Trains for the id join
    pub trains: Vec<Train>,
    /// Stations for the id join
    pub locations: Vec<Location>,
    /// Highlighted row
    pub selected: usize,
    /// Error line
    pub feedback: Feedback,
    /// Request in flight
    pub loading: bool,
}

impl AllBookings {
    /// Fetch bookings, trains and stations together
    pub async fn load(&mut self, api: &dyn BookingApi) {
        self.loading = true;
        let result = tokio::try_join!(api.all_bookings(), api.list_trains(), api.list_locations());
        self.loading = false;

        match result {
            Ok((bookings, trains, locations)) => {
                self.bookings = bookings;
                self.trains = trains;
                self.locations = locations;
                self.feedback.clear();
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch all bookings");
                self.feedback.fail(e.message_or("Failed to fetch bookings"));
            }
        }
    }

    /// Joined rows
    pub fn rows(&self) -> Vec<BookingDetails<'_>> {
        join_bookings(&self.bookings, &self.trains, &self.locations)
    }
}

/// Registered accounts
#[derive(Debug, Clone, Default)]
pub struct UserList {
    /// All users
    pub users: Vec<User>,
    /// Highlighted row
    pub selected: usize,
    /// Error line
    pub feedback: Feedback,
    /// Request in flight
    pub loading: bool,
}

impl UserList {
    /// Fetch the account list
    pub async fn load(&mut self, api: &dyn BookingApi) {
        self.loading = true;
        let result = api.list_users().await;
        self.loading = false;

        match result {
            Ok(users) => {
                self.users = users;
                self.feedback.clear();
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch users");
                self.feedback.fail(e.message_or("Failed to fetch users"));
            }
        }
    }
}

/// Admin dashboard state
#[derive(Debug, Clone, Default)]
pub struct AdminView {
    /// Active tab
    pub tab: AdminTab,
    /// Locations tab
    pub locations: LocationManager,
    /// Trains tab
    pub trains: TrainManager,
    /// All Bookings tab
    pub bookings: AllBookings,
    /// Users tab
    pub users: UserList,
}

impl AdminView {
    /// Load the active tab
    pub async fn load(&mut self, api: &dyn BookingApi) {
        match self.tab {
            AdminTab::Locations => self.locations.load(api).await,
            AdminTab::Trains => self.trains.load(api).await,
            AdminTab::Bookings => self.bookings.load(api).await,
            AdminTab::Users => self.users.load(api).await,
        }
    }

    /// Flag the active tab as fetching
    pub fn mark_loading(&mut self) {
        match self.tab {
            AdminTab::Locations => self.locations.loading = true,
            AdminTab::Trains => self.trains.loading = true,
            AdminTab::Bookings => self.bookings.loading = true,
            AdminTab::Users => self.users.loading = true,
        }
    }

    /// Move to the neighbouring tab. A delete prompt never outlives its tab.
    pub fn cycle_tab(&mut self, forward: bool) {
        self.locations.confirm = None;
        self.trains.confirm = None;
        self.tab = self.tab.cycle(forward);
    }

    /// Move the highlight in the active tab
    pub fn select(&mut self, forward: bool) {
        match self.tab {
            AdminTab::Locations => self.locations.select(forward),
            AdminTab::Trains => self.trains.select(forward),
            AdminTab::Bookings => {
                self.bookings.selected =
                    step(self.bookings.selected, self.bookings.bookings.len(), forward)
            }
            AdminTab::Users => {
                self.users.selected = step(self.users.selected, self.users.users.len(), forward)
            }
        }
    }

    /// Prompt text of a pending delete in the active tab
    pub fn pending_prompt(&self) -> Option<&str> {
        match self.tab {
            AdminTab::Locations => self.locations.confirm.as_ref().map(|c| c.prompt.as_str()),
            AdminTab::Trains => self.trains.confirm.as_ref().map(|c| c.prompt.as_str()),
            _ => None,
        }
    }

    /// Answer a pending delete in the active tab
    pub async fn resolve_confirmation(&mut self, api: &dyn BookingApi, accepted: bool, now: Instant) {
        match self.tab {
            AdminTab::Locations => {
                self.locations
                    .resolve_confirmation(api, accepted, now)
                    .await
            }
            AdminTab::Trains => self.trains.resolve_confirmation(api, accepted, now).await,
            _ => {}
        }
    }

    /// Expire success messages
    pub fn tick(&mut self, now: Instant) {
        self.locations.tick(now);
        self.trains.tick(now);
    }
}
