//! Posted form wrapper and validation checks.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::FormErrors;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("email pattern is valid")
    })
}

/// Submitted form values together with the errors found while validating them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Form {
    /// Raw submitted values
    pub values: HashMap<String, String>,
    /// Validation errors by field
    pub errors: FormErrors,
}

impl Form {
    /// Wrap posted values in a form with no errors yet.
    pub fn new(values: HashMap<String, String>) -> Self {
        Self {
            values,
            errors: FormErrors::new(),
        }
    }

    /// Submitted value for a field, trimmed. Missing fields read as empty.
    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(|v| v.trim()).unwrap_or("")
    }

    /// Check that a field was submitted with a non-empty value.
    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    /// Every listed field must be non-blank.
    pub fn required(&mut self, fields: &[&str]) {
        for field in fields {
            if !self.has(field) {
                self.errors.add(*field, "This field cannot be blank");
            }
        }
    }

    /// Field must be at least `length` characters long.
    pub fn min_length(&mut self, field: &str, length: usize) -> bool {
        if self.get(field).chars().count() < length {
            self.errors.add(
                field,
                format!("This field must be at least {} characters long", length),
            );
            return false;
        }
        true
    }

    /// Field must hold a well-formed email address.
    pub fn is_email(&mut self, field: &str) {
        if !email_pattern().is_match(self.get(field)) {
            self.errors.add(field, "Invalid email address");
        }
    }

    /// True when no check has recorded an error.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }
}
