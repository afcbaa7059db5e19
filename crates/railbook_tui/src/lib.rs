//! # Railbook TUI
//!
//! Terminal front-end for the Railbook booking backend.
//!
//! Uses ratatui for rendering and crossterm for terminal handling. All view
//! logic lives in headless state types so it can be driven from tests
//! without a terminal.
//!
//! ## Routes
//! - **/login**, **/register**: anonymous only
//! - **/**: greeting and role-specific pointers
//! - **/search**: station filters and train results
//! - **/book**: passenger form for the train picked in search
//! - **/my-bookings**: the user's bookings with cancellation
//! - **/admin**: locations, trains, all bookings and users (admins only)
//!
//! ## Components
//! - [`session::SessionController`]: owns the authenticated user
//! - [`router::resolve`]: pure path guard over the session state
//! - [`views`]: one state type per route
//! - [`app::AppState`]: wires the above together; [`app::TuiApp`] adds the
//!   terminal

pub mod app;
pub mod feedback;
pub mod form;
pub mod logging;
pub mod router;
pub mod screens;
pub mod session;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::app::{AppState, TuiApp};
    pub use crate::router::{resolve, Resolution, Route};
    pub use crate::session::{SessionController, SessionState};
    pub use crate::views::Outcome;
}
