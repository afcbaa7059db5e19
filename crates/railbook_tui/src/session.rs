//! Session controller.
//!
//! Owns the authenticated user for the lifetime of the app. The bearer
//! token itself lives in [`LocalStorage`]; this type only decides who is
//! logged in by asking the backend for the profile behind that token.

use std::sync::Arc;

use railbook_client::{BookingApi, LocalStorage};
use railbook_core::models::User;
use tracing::{debug, info, warn};

/// Authentication state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Initial auth check has not finished
    Loading,
    /// No valid token
    Anonymous,
    /// Token accepted by the backend
    Authenticated(User),
}

impl SessionState {
    /// The logged-in user, if any
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Whether a user is logged in
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Whether the logged-in user has the admin flag
    pub fn is_admin(&self) -> bool {
        self.user().map_or(false, |u| u.is_admin)
    }
}

/// Session controller
#[derive(Clone)]
pub struct SessionController {
    state: SessionState,
    api: Arc<dyn BookingApi>,
    storage: Arc<dyn LocalStorage>,
}

impl SessionController {
    /// Create a controller in the `Loading` state
    pub fn new(api: Arc<dyn BookingApi>, storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            state: SessionState::Loading,
            api,
            storage,
        }
    }

    /// Current state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The logged-in user, if any
    pub fn user(&self) -> Option<&User> {
        self.state.user()
    }

    /// Whether the initial check is still pending
    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Loading
    }

    /// Resolve the stored token into a user.
    ///
    /// A token the backend rejects is removed from storage.
    pub async fn check_auth(&mut self) {
        let token = match self.storage.token() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "could not read stored token");
                None
            }
        };

        if token.is_none() {
            debug!("no stored token");
            self.state = SessionState::Anonymous;
            return;
        }

        match self.api.current_user().await {
            Ok(user) => {
                info!(username = %user.username, admin = user.is_admin, "session restored");
                self.state = SessionState::Authenticated(user);
            }
            Err(e) => {
                warn!(error = %e, "stored token rejected");
                if let Err(e) = self.storage.clear_token() {
                    warn!(error = %e, "could not clear stored token");
                }
                self.state = SessionState::Anonymous;
            }
        }
    }

    /// Forget the token and the user. No backend call.
    pub fn logout(&mut self) {
        if let Err(e) = self.storage.clear_token() {
            warn!(error = %e, "could not clear stored token");
        }
        info!("logged out");
        self.state = SessionState::Anonymous;
    }
}
