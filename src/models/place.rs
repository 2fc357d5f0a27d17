// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Point-of-interest model and the raw provider detail payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One point of interest, as found by search and carried in a trip draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/types/generated/")
)]
pub struct Place {
    /// Provider location identifier
    pub id: String,
    pub name: String,
    /// Free-form address or summary
    #[serde(default)]
    pub description: String,
    /// Provider result type (e.g. "attractions")
    #[serde(default)]
    pub category: Option<String>,
    /// User-authored notes
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Place {
    /// Build an unresolved place from search hit fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: None,
            notes: String::new(),
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Attach coordinates, producing a resolved place.
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Both coordinates are present.
    pub fn is_resolved(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Detail payload returned by the provider for a single location.
///
/// The shape is not stable across provider integrations, so the raw JSON is
/// kept and read through accessors. Coordinate extraction lives in the
/// resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderDetail(Value);

impl ProviderDetail {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Top-level field rendered as a string (numbers included).
    pub fn field_str(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<String> {
        self.field_str("name")
    }

    pub fn address(&self) -> Option<String> {
        self.0
            .get("address_obj")
            .and_then(|a| a.get("address_string"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn phone(&self) -> Option<String> {
        self.field_str("phone")
    }

    pub fn website(&self) -> Option<String> {
        self.field_str("website")
    }

    pub fn rating(&self) -> Option<f64> {
        self.field_str("rating").and_then(|r| r.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_accessors() {
        let detail = ProviderDetail::new(json!({
            "name": "Eiffel Tower",
            "address_obj": { "address_string": "Champ de Mars, Paris" },
            "rating": "4.5",
            "phone": "",
            "website": "https://www.toureiffel.paris"
        }));

        assert_eq!(detail.name().as_deref(), Some("Eiffel Tower"));
        assert_eq!(detail.address().as_deref(), Some("Champ de Mars, Paris"));
        assert_eq!(detail.rating(), Some(4.5));
        assert_eq!(detail.phone(), None, "empty strings count as absent");
        assert!(detail.website().is_some());
    }

    #[test]
    fn test_place_resolution_state() {
        let place = Place::new("T1", "Eiffel Tower");
        assert!(!place.is_resolved());
        assert!(place.with_coordinates(48.8584, 2.2945).is_resolved());
    }
}
