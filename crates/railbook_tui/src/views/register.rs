//! Registration view.

use railbook_client::BookingApi;
use railbook_core::forms::RegisterDraft;
use tracing::{info, warn};

use crate::feedback::Feedback;
use crate::form::{Field, FormState};
use crate::router::Route;
use crate::views::Outcome;

const EMAIL: usize = 0;
const USERNAME: usize = 1;
const FULL_NAME: usize = 2;
const PASSWORD: usize = 3;
const AS_ADMIN: usize = 4;

/// Registration form state
#[derive(Debug, Clone)]
pub struct RegisterView {
    /// Account fields plus the admin toggle
    pub form: FormState,
    /// Error line
    pub feedback: Feedback,
    /// Request in flight
    pub loading: bool,
}

impl Default for RegisterView {
    fn default() -> Self {
        Self {
            form: FormState::new(vec![
                Field::text("Email"),
                Field::text("Username"),
                Field::text("Full Name"),
                Field::secret("Password"),
                Field::toggle("Register as Admin"),
            ]),
            feedback: Feedback::default(),
            loading: false,
        }
    }
}

impl RegisterView {
    fn draft(&self) -> RegisterDraft {
        RegisterDraft {
            email: self.form.value(EMAIL).to_string(),
            username: self.form.value(USERNAME).to_string(),
            full_name: self.form.value(FULL_NAME).to_string(),
            password: self.form.value(PASSWORD).to_string(),
            as_admin: self.form.is_on(AS_ADMIN),
        }
    }

    /// Create the account and send the user to the login view
    pub async fn submit(&mut self, api: &dyn BookingApi) -> Outcome {
        self.feedback.clear();
        let draft = self.draft();
        let user = match draft.to_new_user() {
            Ok(user) => user,
            Err(e) => {
                self.feedback.fail(e.to_string());
                return Outcome::Stay;
            }
        };

        self.loading = true;
        let result = if draft.as_admin {
            api.register_admin(&user).await
        } else {
            api.register(&user).await
        };
        self.loading = false;

        match result {
            Ok(created) => {
                info!(username = %created.username, admin = created.is_admin, "registered");
                *self = Self::default();
                let role = if draft.as_admin { "Admin" } else { "User" };
                Outcome::go_with(
                    Route::Login,
                    format!("{} registered successfully! Please login.", role),
                )
            }
            Err(e) => {
                warn!(error = %e, "registration failed");
                self.feedback.fail(e.message_or("Registration failed"));
                Outcome::Stay
            }
        }
    }
}
