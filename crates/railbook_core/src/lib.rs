//! # railbook_core: Resource Model for the Railbook Client
//!
//! ## Core Layer Role
//!
//! railbook_core sits at the bottom of the workspace and provides:
//! - Passthrough mirrors of the backend resources (`models`)
//! - Raw form drafts and their coercion into typed payloads (`forms`)
//! - Id joins and display labels used by list views (`lookup`)
//! - Form error type: `FormError` (`error`)
//!
//! The client holds no authoritative state. Nothing in this crate talks to
//! the network; the REST client lives in `railbook_client`.
//!
//! ## Usage Examples
//!
//! ```rust
//! use railbook_core::forms::LocationDraft;
//!
//! let draft = LocationDraft {
//!     name: "Chennai Central".to_string(),
//!     code: "MAS".to_string(),
//!     city: "Chennai".to_string(),
//!     state: "Tamil Nadu".to_string(),
//! };
//! let payload = draft.to_new_location().unwrap();
//! assert_eq!(payload.code, "MAS");
//! ```

#![deny(missing_docs)]

pub mod error;
pub mod forms;
pub mod lookup;
pub mod models;

pub use error::FormError;
pub use models::{
    AccessToken, Booking, BookingStatus, CancelReceipt, Credentials, Location, LocationUpdate,
    NewBooking, NewLocation, NewTrain, NewUser, Train, TrainQuery, TrainUpdate, User,
};
