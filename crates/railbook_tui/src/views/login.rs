//! Login view.

use railbook_client::{BookingApi, LocalStorage};
use railbook_core::forms::LoginDraft;
use tracing::{info, warn};

use crate::feedback::Feedback;
use crate::form::{Field, FormState};
use crate::views::Outcome;

const USERNAME: usize = 0;
const PASSWORD: usize = 1;

/// Login form state
#[derive(Debug, Clone)]
pub struct LoginView {
    /// Username and password fields
    pub form: FormState,
    /// Error line
    pub feedback: Feedback,
    /// Request in flight
    pub loading: bool,
}

impl Default for LoginView {
    fn default() -> Self {
        Self {
            form: FormState::new(vec![Field::text("Username"), Field::secret("Password")]),
            feedback: Feedback::default(),
            loading: false,
        }
    }
}

impl LoginView {
    fn draft(&self) -> LoginDraft {
        LoginDraft {
            username: self.form.value(USERNAME).to_string(),
            password: self.form.value(PASSWORD).to_string(),
        }
    }

    /// Exchange the credentials for a token and store it
    pub async fn submit(&mut self, api: &dyn BookingApi, storage: &dyn LocalStorage) -> Outcome {
        self.feedback.clear();
        let credentials = match self.draft().to_credentials() {
            Ok(c) => c,
            Err(e) => {
                self.feedback.fail(e.to_string());
                return Outcome::Stay;
            }
        };

        self.loading = true;
        let result = api.login(&credentials).await;
        self.loading = false;

        let token = match result {
            Ok(token) => token,
            Err(e) => {
                warn!(username = %credentials.username, error = %e, "login failed");
                self.feedback.fail(e.message_or("Login failed"));
                return Outcome::Stay;
            }
        };

        if let Err(e) = storage.set_token(&token.access_token) {
            warn!(error = %e, "could not persist token");
            self.feedback.fail("Login failed");
            return Outcome::Stay;
        }

        info!(username = %credentials.username, "logged in");
        *self = Self::default();
        Outcome::LoggedIn
    }
}
