//! Backend resource mirrors.
//!
//! Every type here matches the JSON the booking backend sends or accepts.
//! Create payloads carry every required field; update payloads carry only
//! the fields being changed.

mod booking;
mod location;
mod train;
mod user;

pub use booking::{Booking, BookingStatus, CancelReceipt, NewBooking, GENDER_OPTIONS};
pub use location::{Location, LocationUpdate, NewLocation};
pub use train::{NewTrain, Train, TrainQuery, TrainUpdate};
pub use user::{AccessToken, Credentials, NewUser, User};
