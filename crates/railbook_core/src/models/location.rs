use serde::{Deserialize, Serialize};

/// A railway station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Backend identifier
    pub id: i64,
    /// Station name, e.g. `Chennai Central`
    pub name: String,
    /// Station code, e.g. `MAS`
    pub code: String,
    /// City the station serves
    pub city: String,
    /// State or region
    pub state: String,
    /// Server timestamp, kept verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Location {
    /// `Name (CODE)` label used in selectors and route columns.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }
}

/// Payload for `POST /locations/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewLocation {
    /// Station name
    pub name: String,
    /// Station code
    pub code: String,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
}

/// Payload for `PUT /locations/:id`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocationUpdate {
    /// New station name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New station code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// New city
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// New state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl LocationUpdate {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.code.is_none() && self.city.is_none() && self.state.is_none()
    }
}
