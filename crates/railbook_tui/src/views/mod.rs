//! Headless view state, one type per route.
//!
//! Views own their form fields, fetched lists and feedback line. Backend
//! calls take the API explicitly so the same state drives the terminal
//! and the tests.

pub mod admin;
pub mod booking;
pub mod home;
pub mod locations;
pub mod login;
pub mod my_bookings;
pub mod register;
pub mod search;
pub mod trains;

use railbook_core::models::Train;

use crate::router::Route;

/// What the app should do after a view action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Remain on the current view
    Stay,
    /// Go to another route, optionally showing a notice there
    Navigate {
        /// Target route
        route: Route,
        /// Banner shown after navigating
        notice: Option<String>,
    },
    /// Open the booking form for a train
    Book(Train),
    /// A token was stored; resolve the session again, then open home
    LoggedIn,
}

impl Outcome {
    /// Navigate without a notice
    pub fn go(route: Route) -> Self {
        Self::Navigate {
            route,
            notice: None,
        }
    }

    /// Navigate and show `notice`
    pub fn go_with(route: Route, notice: impl Into<String>) -> Self {
        Self::Navigate {
            route,
            notice: Some(notice.into()),
        }
    }
}
