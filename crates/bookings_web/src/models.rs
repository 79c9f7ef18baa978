//! Domain records shared between handlers and templates.

use bookings_forms::Form;
use serde::{Deserialize, Serialize};

/// Reservation details collected by the reservation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl Reservation {
    pub fn from_form(form: &Form) -> Self {
        Self {
            first_name: form.get("first_name").to_string(),
            last_name: form.get("last_name").to_string(),
            email: form.get("email").to_string(),
            phone: form.get("phone").to_string(),
        }
    }
}

/// Body of the availability JSON endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub ok: bool,
    pub message: String,
}
