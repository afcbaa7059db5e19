//! Transient messages and confirmation prompts shared by the views.

use std::time::{Duration, Instant};

/// How long a success message stays on screen
pub const SUCCESS_TTL: Duration = Duration::from_secs(3);

/// A message that expires after a fixed delay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    message: String,
    shown_at: Instant,
    ttl: Duration,
}

impl Flash {
    /// Show `message` from `now` for `ttl`
    pub fn new(message: impl Into<String>, now: Instant, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            shown_at: now,
            ttl,
        }
    }

    /// Message text
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the message should be gone by `now`
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.ttl
    }
}

/// Error and success line of a view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feedback {
    error: Option<String>,
    success: Option<Flash>,
}

impl Feedback {
    /// Current error text
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current success text
    pub fn success(&self) -> Option<&str> {
        self.success.as_ref().map(Flash::message)
    }

    /// Drop both messages; called when a new action starts
    pub fn clear(&mut self) {
        self.error = None;
        self.success = None;
    }

    /// Show an error. Errors stay until the next action.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.success = None;
        self.error = Some(message.into());
    }

    /// Show a success message for [`SUCCESS_TTL`]
    pub fn succeed(&mut self, message: impl Into<String>, now: Instant) {
        self.error = None;
        self.success = Some(Flash::new(message, now, SUCCESS_TTL));
    }

    /// Expire the success message
    pub fn tick(&mut self, now: Instant) {
        if self.success.as_ref().map_or(false, |f| f.is_expired(now)) {
            self.success = None;
        }
    }
}

/// A destructive action waiting for a yes/no answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation<A> {
    /// Question shown to the user
    pub prompt: String,
    /// Action performed on "yes"
    pub action: A,
}

impl<A> Confirmation<A> {
    /// Ask `prompt` before running `action`
    pub fn new(prompt: impl Into<String>, action: A) -> Self {
        Self {
            prompt: prompt.into(),
            action,
        }
    }
}
