//! # bookings_forms
//!
//! Posted form handling for the bookings site.
//!
//! A [`Form`] wraps the submitted field values and collects field-level
//! validation errors. Handlers run the checks they need, then hand the form
//! to the view-model so templates can echo values back and show errors next
//! to the offending fields.
//!
//! ```rust
//! use std::collections::HashMap;
//! use bookings_forms::Form;
//!
//! let mut values = HashMap::new();
//! values.insert("email".to_string(), "guest@example.com".to_string());
//!
//! let mut form = Form::new(values);
//! form.required(&["email", "first_name"]);
//! form.is_email("email");
//!
//! assert!(!form.valid());
//! assert_eq!(form.errors.get("first_name"), Some("This field cannot be blank"));
//! ```

pub mod errors;
pub mod form;

pub use errors::FormErrors;
pub use form::Form;
