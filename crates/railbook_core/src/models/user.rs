use serde::{Deserialize, Serialize};
use std::fmt;

/// Authenticated account as returned by `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend identifier
    pub id: i64,
    /// Login name
    pub username: String,
    /// Contact address
    pub email: String,
    /// Display name, if the user supplied one
    #[serde(default)]
    pub full_name: Option<String>,
    /// Role flag granting access to the admin panel
    #[serde(default)]
    pub is_admin: bool,
    /// Whether the account is enabled
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl User {
    /// Name used in greetings.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Registration payload for `/auth/register` and `/auth/register-admin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    /// Contact address
    pub email: String,
    /// Login name
    pub username: String,
    /// Plain-text password, sent once over the wire
    pub password: String,
    /// Optional display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Login credentials, sent form-encoded to `/auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Login name
    pub username: String,
    /// Plain-text password
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Bearer token issued by `/auth/login`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AccessToken {
    /// Opaque credential attached to later requests
    pub access_token: String,
    /// Token scheme, normally `bearer`
    #[serde(default)]
    pub token_type: Option<String>,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"***")
            .field("token_type", &self.token_type)
            .finish()
    }
}
