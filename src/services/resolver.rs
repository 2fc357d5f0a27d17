// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Place resolution: turn a search hit into a coordinate-bearing place.
//!
//! Provider detail payloads put coordinates under different keys depending
//! on the integration. Each key layout is an extractor; extractors are
//! tried in priority order and the first one that yields a finite number
//! wins.

use crate::error::{AppError, Result};
use crate::models::{Place, ProviderDetail};
use crate::services::AttractionsProvider;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

/// Reads one coordinate from a detail payload, if present and numeric.
pub type Extractor = fn(&Value) -> Option<f64>;

/// Latitude probes, highest priority first.
pub const LATITUDE_EXTRACTORS: &[Extractor] = &[latitude, lat, geo_lat, location_lat];

/// Longitude probes, highest priority first.
pub const LONGITUDE_EXTRACTORS: &[Extractor] = &[longitude, lng, geo_lng, location_lng];

fn latitude(d: &Value) -> Option<f64> {
    number(d.get("latitude")?)
}

fn lat(d: &Value) -> Option<f64> {
    number(d.get("lat")?)
}

fn geo_lat(d: &Value) -> Option<f64> {
    number(d.get("geo_lat")?)
}

fn location_lat(d: &Value) -> Option<f64> {
    number(d.get("location")?.get("lat")?)
}

fn longitude(d: &Value) -> Option<f64> {
    number(d.get("longitude")?)
}

fn lng(d: &Value) -> Option<f64> {
    number(d.get("lng")?)
}

fn geo_lng(d: &Value) -> Option<f64> {
    number(d.get("geo_lng")?)
}

fn location_lng(d: &Value) -> Option<f64> {
    number(d.get("location")?.get("lng")?)
}

/// JSON numbers and numeric strings count; non-finite values do not.
fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}

/// Run extractors in order and return the first hit.
pub fn extract(detail: &Value, extractors: &[Extractor]) -> Option<f64> {
    extractors.iter().find_map(|probe| probe(detail))
}

/// Latitude and longitude from a provider detail, if both are present.
pub fn coordinates(detail: &ProviderDetail) -> Option<(f64, f64)> {
    let lat = extract(detail.raw(), LATITUDE_EXTRACTORS)?;
    let lng = extract(detail.raw(), LONGITUDE_EXTRACTORS)?;
    Some((lat, lng))
}

/// Resolves search hits via detail lookups, once per place id per session.
#[derive(Clone)]
pub struct PlaceResolver {
    provider: Arc<dyn AttractionsProvider>,
    /// Coordinates already resolved this session, keyed by place id.
    resolved: Arc<DashMap<String, (f64, f64)>>,
}

impl PlaceResolver {
    pub fn new(provider: Arc<dyn AttractionsProvider>) -> Self {
        Self {
            provider,
            resolved: Arc::new(DashMap::new()),
        }
    }

    /// Whether `place_id` has been resolved before in this session.
    pub fn is_resolved(&self, place_id: &str) -> bool {
        self.resolved.contains_key(place_id)
    }

    /// Attach coordinates to `hit`.
    ///
    /// Fails with [`AppError::NoLocationData`] when the detail carries no
    /// usable latitude or longitude; provider errors pass through unchanged.
    pub async fn resolve(&self, hit: Place) -> Result<Place> {
        if let Some(known) = self.resolved.get(&hit.id) {
            let (lat, lng) = *known;
            tracing::debug!(place_id = %hit.id, "Place already resolved, skipping detail lookup");
            return Ok(hit.with_coordinates(lat, lng));
        }

        let detail = self.provider.fetch_detail(&hit.id).await?;

        let Some((lat, lng)) = coordinates(&detail) else {
            tracing::info!(place_id = %hit.id, "Place rejected: no location data");
            return Err(AppError::NoLocationData(hit.id));
        };

        self.resolved.insert(hit.id.clone(), (lat, lng));
        tracing::debug!(place_id = %hit.id, lat, lng, "Place resolved");
        Ok(hit.with_coordinates(lat, lng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coords(raw: Value) -> Option<(f64, f64)> {
        coordinates(&ProviderDetail::new(raw))
    }

    #[test]
    fn test_each_key_layout() {
        assert_eq!(coords(json!({ "latitude": "34.9671", "longitude": "135.7727" })), Some((34.9671, 135.7727)));
        assert_eq!(coords(json!({ "lat": 48.8584, "lng": 2.2945 })), Some((48.8584, 2.2945)));
        assert_eq!(coords(json!({ "geo_lat": "1.5", "geo_lng": "-2.5" })), Some((1.5, -2.5)));
        assert_eq!(coords(json!({ "location": { "lat": 10, "lng": 20 } })), Some((10.0, 20.0)));
    }

    #[test]
    fn test_priority_order() {
        let raw = json!({ "latitude": 1.0, "lat": 2.0, "longitude": 3.0, "lng": 4.0 });
        assert_eq!(coords(raw), Some((1.0, 3.0)));
    }

    #[test]
    fn test_unparseable_key_falls_through() {
        let raw = json!({ "latitude": "", "lat": " 48.8584 ", "longitude": null, "lng": "2.2945" });
        assert_eq!(coords(raw), Some((48.8584, 2.2945)));
    }

    #[test]
    fn test_rejects_missing_or_non_finite() {
        assert_eq!(coords(json!({ "name": "Nowhere" })), None);
        assert_eq!(coords(json!({ "lat": "48.8", "lng": "abc" })), None);
        assert_eq!(coords(json!({ "lat": "NaN", "lng": "inf" })), None);
        assert_eq!(coords(json!({ "location": "Paris" })), None);
    }
}
