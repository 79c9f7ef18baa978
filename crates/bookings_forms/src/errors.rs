//! Field-level validation errors.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Validation messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(HashMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// First message recorded for a field, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// All messages recorded for a field.
    pub fn all(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_first_message() {
        let mut errors = FormErrors::new();
        assert_eq!(errors.get("email"), None);

        errors.add("email", "Invalid email address");
        errors.add("email", "Too short");

        assert_eq!(errors.get("email"), Some("Invalid email address"));
        assert_eq!(errors.all("email").len(), 2);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut errors = FormErrors::new();
        errors.add("first_name", "This field cannot be blank");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["first_name"][0], "This field cannot be blank");
    }
}
