// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trip records as stored under `trips/{userId}/{tripId}`.
//!
//! Records written by older clients can be sparse: fields may be missing or
//! `null`, and the places array may come back as an index-keyed object.
//! Deserialization maps all of that onto documented defaults so a load never
//! fails on shape alone.

use crate::models::Place;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const UNTITLED_TRIP: &str = "Untitled Trip";
pub const UNKNOWN_PLACE: &str = "Unknown";

/// Snapshot of a place as persisted inside a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/types/generated/")
)]
pub struct TripPlace {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default = "unknown_place", deserialize_with = "or_unknown_place")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub longitude: f64,
}

impl TripPlace {
    /// Snapshot a resolved draft place. Returns `None` when coordinates are
    /// missing.
    pub fn from_place(place: &Place) -> Option<Self> {
        Some(Self {
            id: place.id.clone(),
            name: place.name.clone(),
            description: place.description.clone(),
            category: place.category.clone().unwrap_or_default(),
            notes: place.notes.clone(),
            latitude: place.latitude?,
            longitude: place.longitude?,
        })
    }

    /// Turn the snapshot back into an editable place.
    pub fn to_place(&self) -> Place {
        Place {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            category: Some(self.category.clone()).filter(|c| !c.is_empty()),
            notes: self.notes.clone(),
            latitude: Some(self.latitude),
            longitude: Some(self.longitude),
        }
    }
}

/// A named, ordered collection of places owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/types/generated/")
)]
pub struct Trip {
    /// Store key; not part of the stored record body
    #[serde(skip)]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(default = "untitled_trip", deserialize_with = "or_untitled_trip")]
    pub title: String,
    /// General notes, independent of per-place notes
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(default, deserialize_with = "places_from_seq_or_map")]
    pub places: Vec<TripPlace>,
    /// ISO 8601, fixed at first save
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    /// ISO 8601, refreshed on every save
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_shared: bool,
}

impl Trip {
    /// Decode a stored record. The id and owner come from the record's key,
    /// never from its body.
    pub fn from_record(
        user_id: &str,
        trip_id: &str,
        record: Value,
    ) -> Result<Self, serde_json::Error> {
        let mut trip: Trip = serde_json::from_value(record)?;
        trip.id = trip_id.to_string();
        trip.user_id = user_id.to_string();
        Ok(trip)
    }
}

/// Row in the owner's trip list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/types/generated/")
)]
pub struct TripSummary {
    pub id: String,
    pub title: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub destination_count: usize,
    pub created_at: String,
    pub updated_at: String,
    pub is_shared: bool,
}

impl From<&Trip> for TripSummary {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.id.clone(),
            title: trip.title.clone(),
            destination_count: trip.places.len(),
            created_at: trip.created_at.clone(),
            updated_at: trip.updated_at.clone(),
            is_shared: trip.is_shared,
        }
    }
}

fn untitled_trip() -> String {
    UNTITLED_TRIP.to_string()
}

fn unknown_place() -> String {
    UNKNOWN_PLACE.to_string()
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn or_untitled_trip<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let title: Option<String> = Option::deserialize(deserializer)?;
    Ok(title.filter(|t| !t.is_empty()).unwrap_or_else(untitled_trip))
}

fn or_unknown_place<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let name: Option<String> = Option::deserialize(deserializer)?;
    Ok(name.filter(|n| !n.is_empty()).unwrap_or_else(unknown_place))
}

/// Accept `[...]` or `{"0": ..., "1": ...}`; holes and `null` entries are skipped.
fn places_from_seq_or_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<TripPlace>, D::Error> {
    let raw: Option<Value> = Option::deserialize(deserializer)?;

    let entries: Vec<Value> = match raw {
        Some(Value::Array(items)) => items,
        Some(Value::Object(map)) => {
            let mut indexed: Vec<(usize, Value)> = map
                .into_iter()
                .filter_map(|(k, v)| k.parse::<usize>().ok().map(|i| (i, v)))
                .collect();
            indexed.sort_by_key(|(i, _)| *i);
            indexed.into_iter().map(|(_, v)| v).collect()
        }
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter(|v| !v.is_null())
        .map(|v| serde_json::from_value(v).map_err(serde::de::Error::custom))
        .collect()
}
