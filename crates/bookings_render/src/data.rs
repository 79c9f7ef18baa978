//! View-model handed from request handlers to the renderer.

use std::collections::HashMap;

use bookings_forms::Form;
use serde::{Deserialize, Serialize};

/// Site-wide values available to every template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContext {
    /// Display name of the site
    pub name: String,
    /// Whether the server runs in production mode
    pub in_production: bool,
}

impl SiteContext {
    pub fn new(name: impl Into<String>, in_production: bool) -> Self {
        Self {
            name: name.into(),
            in_production,
        }
    }
}

/// Per-request data a page template is executed against.
///
/// Handlers fill everything except `csrf_token` and `site`, which the
/// renderer sets right before execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateData {
    pub string_map: HashMap<String, String>,
    pub int_map: HashMap<String, i64>,
    pub float_map: HashMap<String, f64>,
    /// Loosely typed values for anything the typed maps don't cover
    pub data: HashMap<String, serde_json::Value>,
    /// Business entity the page is about, if any
    pub entity: Option<serde_json::Value>,
    /// Posted form values and their validation errors
    pub form: Form,
    pub flash: String,
    pub warning: String,
    pub error: String,
    /// Anti-forgery token for the current request
    pub csrf_token: String,
    pub site: Option<SiteContext>,
}

impl TemplateData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.string_map.insert(key.into(), value.into());
        self
    }

    pub fn with_int(mut self, key: impl Into<String>, value: i64) -> Self {
        self.int_map.insert(key.into(), value);
        self
    }

    pub fn with_float(mut self, key: impl Into<String>, value: f64) -> Self {
        self.float_map.insert(key.into(), value);
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Attach a business entity, serialized to JSON.
    pub fn with_entity<T: Serialize>(mut self, entity: &T) -> serde_json::Result<Self> {
        self.entity = Some(serde_json::to_value(entity)?);
        Ok(self)
    }

    pub fn with_form(mut self, form: Form) -> Self {
        self.form = form;
        self
    }

    pub fn with_flash(mut self, message: impl Into<String>) -> Self {
        self.flash = message.into();
        self
    }

    pub fn with_warning(mut self, message: impl Into<String>) -> Self {
        self.warning = message.into();
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = message.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Room {
        name: &'static str,
        beds: u8,
    }

    #[test]
    fn test_builder_fills_maps() {
        let data = TemplateData::new()
            .with_string("name", "World")
            .with_int("nights", 3)
            .with_float("price", 99.5)
            .with_data("tags", serde_json::json!(["quiet", "sea view"]))
            .with_flash("Saved");

        assert_eq!(data.string_map["name"], "World");
        assert_eq!(data.int_map["nights"], 3);
        assert_eq!(data.data["tags"][1], "sea view");
        assert_eq!(data.flash, "Saved");
        assert!(data.csrf_token.is_empty());
        assert!(data.site.is_none());
    }

    #[test]
    fn test_with_entity() {
        let data = TemplateData::new()
            .with_entity(&Room {
                name: "Major's Suite",
                beds: 2,
            })
            .unwrap();

        let entity = data.entity.unwrap();
        assert_eq!(entity["name"], "Major's Suite");
        assert_eq!(entity["beds"], 2);
    }
}
