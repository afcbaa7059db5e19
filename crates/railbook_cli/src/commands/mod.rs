//! CLI command implementations

pub mod auth;
pub mod bookings;
pub mod check;
pub mod locations;
pub mod search;
pub mod trains;
pub mod users;

use std::io::{BufRead, Write};

use chrono::NaiveDate;
use railbook_client::{BookingApi, LocalStorage};
use railbook_core::Location;

use crate::output::OutputFormat;
use crate::{CliError, Result};

/// Everything a command needs besides its own arguments.
pub struct Context<'a> {
    /// Backend client
    pub api: &'a dyn BookingApi,
    /// Token storage shared with the client
    pub storage: &'a dyn LocalStorage,
    /// Output format
    pub format: OutputFormat,
    /// Local calendar date
    pub today: NaiveDate,
}

impl Context<'_> {
    /// Fail early when no token is stored.
    pub fn require_login(&self) -> Result<()> {
        match self.storage.token()? {
            Some(_) => Ok(()),
            None => Err(CliError::NotLoggedIn),
        }
    }
}

/// True for `y` or `yes`, any case.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Ask a yes/no question; anything but yes declines.
pub fn confirm(prompt: &str, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<bool> {
    write!(out, "{} [y/N] ", prompt)?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

/// Resolve a station given as an id or a station code.
pub fn resolve_station(locations: &[Location], raw: &str) -> Result<i64> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<i64>() {
        return Ok(id);
    }
    locations
        .iter()
        .find(|l| l.code.eq_ignore_ascii_case(raw))
        .map(|l| l.id)
        .ok_or_else(|| CliError::InvalidArgument(format!("Unknown station: {}", raw)))
}
