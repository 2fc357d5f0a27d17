// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public projection of a trip, stored under `sharedTrips/{tripId}`.

use crate::models::trip::null_as_default;
use crate::models::Trip;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Who published a shared trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/types/generated/")
)]
pub struct Author {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Avatar image URL
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Denormalized, author-attributed trip view for the public feed.
///
/// Carries only a place count; per-place detail is fetched on demand from
/// the owner's private record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/types/generated/")
)]
pub struct SharedTripSummary {
    /// Trip id (also the store key)
    #[serde(rename = "tripId", default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Owner back-reference
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub destination_count: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: Author,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: u32,
    /// Publish time, Unix milliseconds
    #[serde(default, deserialize_with = "null_as_default")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub timestamp: i64,
}

impl SharedTripSummary {
    /// Project a persisted trip for the feed.
    pub fn from_trip(trip: &Trip, author: &Author, timestamp: i64) -> Self {
        Self {
            id: trip.id.clone(),
            user_id: trip.user_id.clone(),
            title: trip.title.clone(),
            notes: trip.notes.clone(),
            destination_count: trip.places.len(),
            author: author.clone(),
            likes: 0,
            timestamp,
        }
    }
}
