//! Home view: greeting and role-specific pointers.

use railbook_core::models::User;

use crate::router::Route;

/// Text blocks shown on the home screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeContent {
    /// Welcome line
    pub greeting: String,
    /// What the user can do from here
    pub pointers: Vec<(&'static str, Route)>,
}

/// Home screen content for `user`
pub fn home_content(user: &User) -> HomeContent {
    let greeting = format!("Welcome, {}!", user.display_name());
    let pointers = if user.is_admin {
        vec![
            ("Manage stations and trains in the Admin Dashboard", Route::Admin),
            ("Search trains", Route::Search),
        ]
    } else {
        vec![
            ("Search trains and book a seat", Route::Search),
            ("Review or cancel your bookings", Route::MyBookings),
        ]
    };
    HomeContent { greeting, pointers }
}
