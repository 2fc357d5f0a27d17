// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trip store adapter: persists drafts under `trips/{userId}/{tripId}` and
//! maintains the public `sharedTrips/{tripId}` projection.
//!
//! The private record and the shared projection are separate records. When
//! the store can write several paths atomically, publish and delete use
//! that; otherwise they write one path at a time and a failure in between
//! is reported as [`AppError::StoreWrite`] so the caller can retry the
//! whole operation. [`TripStore::reconcile_shared`] repairs trips left
//! marked shared without a projection.

use crate::db::{paths, Subscription, TreeStore};
use crate::error::{AppError, Result};
use crate::models::{Author, SharedTripSummary, Trip, TripPlace, TripSummary};
use crate::services::TripDraft;
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

/// Source of "now" for timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Pending deletion of a saved trip; apply with [`TripStore::delete`] once
/// the user confirms.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a delete request does nothing until applied"]
pub struct DeleteRequest {
    user_id: String,
    trip_id: String,
    title: String,
}

impl DeleteRequest {
    pub fn trip_id(&self) -> &str {
        &self.trip_id
    }

    /// Confirmation prompt for the user.
    pub fn prompt(&self) -> String {
        format!("Are you sure you want to delete \"{}\"?", self.title)
    }
}

/// Bridges trip drafts to the persistent tree store.
#[derive(Clone)]
pub struct TripStore {
    store: Arc<dyn TreeStore>,
    clock: Clock,
}

impl TripStore {
    pub fn new(store: Arc<dyn TreeStore>) -> Self {
        Self {
            store,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the clock used for `createdAt`/`updatedAt` and publish times.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    // ─── Save / Load ─────────────────────────────────────────────

    /// Persist a draft as a new trip, or overwrite `existing_trip_id`.
    ///
    /// Updating keeps the stored `createdAt` and `isShared`. Validation
    /// failures never touch the store.
    pub async fn save(
        &self,
        user_id: &str,
        draft: &TripDraft,
        existing_trip_id: Option<&str>,
    ) -> Result<Trip> {
        let title = draft.title().trim();
        if title.is_empty() {
            return Err(AppError::Validation("Please enter a trip name.".to_string()));
        }
        if draft.places().is_empty() {
            return Err(AppError::Validation(
                "Please add at least one place.".to_string(),
            ));
        }
        let places = draft
            .places()
            .iter()
            .map(|p| {
                TripPlace::from_place(p).ok_or_else(|| {
                    AppError::Validation(format!("\"{}\" has no location data.", p.name))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let trips_path = paths::user_trips(user_id)?;

        let now = format_utc_rfc3339(self.now());
        let mut trip = Trip {
            id: String::new(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            notes: draft.general_notes().to_string(),
            places,
            created_at: now.clone(),
            updated_at: now,
            is_shared: false,
        };

        match existing_trip_id {
            None => {
                trip.id = self.store.push(&trips_path, to_record(&trip)?).await?;
                tracing::info!(user_id, trip_id = %trip.id, places = trip.places.len(), "Trip created");
            }
            Some(trip_id) => {
                let path = paths::trip(user_id, trip_id)?;
                if let Some(previous) = self.store.get(&path).await? {
                    if let Some(created_at) = previous
                        .get("createdAt")
                        .and_then(Value::as_str)
                        .filter(|s| !s.is_empty())
                    {
                        trip.created_at = created_at.to_string();
                    }
                    trip.is_shared = previous
                        .get("isShared")
                        .and_then(Value::as_bool)
                        .unwrap_or(false);
                } else {
                    tracing::warn!(user_id, trip_id, "Updating a trip with no stored record");
                }

                trip.id = trip_id.to_string();
                self.store.set(&path, to_record(&trip)?).await?;
                tracing::info!(user_id, trip_id, places = trip.places.len(), "Trip updated");
            }
        }

        Ok(trip)
    }

    /// Load one trip, mapping missing fields to their defaults.
    pub async fn load(&self, user_id: &str, trip_id: &str) -> Result<Trip> {
        let path = paths::trip(user_id, trip_id)?;
        let record = self
            .store
            .get(&path)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Trip {} not found", trip_id)))?;

        Trip::from_record(user_id, trip_id, record)
            .map_err(|e| AppError::StoreRead(format!("Malformed trip record at {}: {}", path, e)))
    }

    /// Live list of one user's trips; each update replaces the whole list.
    pub async fn subscribe_my_trips(&self, user_id: &str) -> Result<Subscription<Vec<TripSummary>>> {
        let subscription = self.store.subscribe(&paths::user_trips(user_id)?).await?;
        let owner = user_id.to_string();
        Ok(subscription.map(move |snapshot| trip_summaries(&owner, snapshot)))
    }

    // ─── Sharing ─────────────────────────────────────────────────

    /// Mark a saved trip shared and write its public summary.
    ///
    /// Safe to retry: both writes are full overwrites, and an existing
    /// like count is carried over.
    pub async fn publish(&self, trip: &Trip, author: &Author) -> Result<SharedTripSummary> {
        if trip.id.is_empty() {
            return Err(AppError::NotFound(
                "Trip must be saved before it can be shared".to_string(),
            ));
        }
        let trip_path = paths::trip(&trip.user_id, &trip.id)?;
        let shared_path = paths::shared_trip(&trip.id)?;

        if self.store.get(&trip_path).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Trip {} must be saved before it can be shared",
                trip.id
            )));
        }

        let mut summary = SharedTripSummary::from_trip(trip, author, self.now().timestamp_millis());
        if let Some(existing) = self.store.get(&shared_path).await? {
            summary.likes = existing
                .get("likes")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
        }
        let summary_value = to_record(&summary)?;

        if self.store.supports_multi_path() {
            let mut updates = Map::new();
            updates.insert(format!("{}/isShared", trip_path), Value::Bool(true));
            updates.insert(shared_path, summary_value);
            self.store
                .update_many(updates)
                .await
                .map_err(as_write_failure)?;
        } else {
            let mut flag = Map::new();
            flag.insert("isShared".to_string(), Value::Bool(true));
            self.store
                .update(&trip_path, flag)
                .await
                .map_err(as_write_failure)?;

            if let Err(e) = self.store.set(&shared_path, summary_value).await {
                tracing::warn!(
                    trip_id = %trip.id,
                    error = %e,
                    "Trip marked shared but summary write failed; publish must be retried"
                );
                return Err(as_write_failure(e));
            }
        }

        tracing::info!(user_id = %trip.user_id, trip_id = %trip.id, "Trip published");
        Ok(summary)
    }

    /// Rewrite summaries for trips marked shared whose projection is
    /// missing. Returns how many were repaired.
    pub async fn reconcile_shared(&self, author_for: impl Fn(&str) -> Author) -> Result<usize> {
        let all_trips = self.store.get(paths::TRIPS).await?.unwrap_or(Value::Null);
        let shared_ids: HashSet<String> = self
            .store
            .get(paths::SHARED_TRIPS)
            .await?
            .and_then(|v| v.as_object().map(|m| m.keys().cloned().collect()))
            .unwrap_or_default();

        let mut repaired = 0;
        let Some(users) = all_trips.as_object() else {
            return Ok(0);
        };

        for (user_id, trips) in users {
            let Some(trips) = trips.as_object() else {
                continue;
            };
            for (trip_id, record) in trips {
                let marked_shared = record.get("isShared").and_then(Value::as_bool) == Some(true);
                if !marked_shared || shared_ids.contains(trip_id) {
                    continue;
                }

                let trip = match Trip::from_record(user_id, trip_id, record.clone()) {
                    Ok(trip) => trip,
                    Err(e) => {
                        tracing::warn!(user_id, trip_id, error = %e, "Skipping malformed trip during reconcile");
                        continue;
                    }
                };

                let summary = SharedTripSummary::from_trip(
                    &trip,
                    &author_for(user_id),
                    self.now().timestamp_millis(),
                );
                self.store
                    .set(&paths::shared_trip(trip_id)?, to_record(&summary)?)
                    .await
                    .map_err(as_write_failure)?;
                repaired += 1;
            }
        }

        if repaired > 0 {
            tracing::info!(repaired, "Shared trip projections repaired");
        }
        Ok(repaired)
    }

    // ─── Deletion ────────────────────────────────────────────────

    /// Look up a trip and return a deletion request to confirm.
    pub async fn request_delete(&self, user_id: &str, trip_id: &str) -> Result<DeleteRequest> {
        let trip = self.load(user_id, trip_id).await?;
        Ok(DeleteRequest {
            user_id: user_id.to_string(),
            trip_id: trip_id.to_string(),
            title: trip.title,
        })
    }

    /// Delete a confirmed trip and its shared projection, if any.
    pub async fn delete(&self, request: DeleteRequest) -> Result<()> {
        let trip_path = paths::trip(&request.user_id, &request.trip_id)?;
        let shared_path = paths::shared_trip(&request.trip_id)?;

        if self.store.supports_multi_path() {
            let mut updates = Map::new();
            updates.insert(trip_path, Value::Null);
            updates.insert(shared_path, Value::Null);
            self.store
                .update_many(updates)
                .await
                .map_err(as_write_failure)?;
        } else {
            self.store.remove(&trip_path).await.map_err(as_write_failure)?;
            if self.store.get(&shared_path).await?.is_some() {
                self.store
                    .remove(&shared_path)
                    .await
                    .map_err(as_write_failure)?;
            }
        }

        tracing::info!(user_id = %request.user_id, trip_id = %request.trip_id, "Trip deleted");
        Ok(())
    }
}

/// Decode a `trips/{userId}` snapshot into list rows, skipping malformed
/// records.
pub fn trip_summaries(user_id: &str, snapshot: Option<Value>) -> Vec<TripSummary> {
    let Some(Value::Object(records)) = snapshot else {
        return Vec::new();
    };

    records
        .into_iter()
        .filter_map(|(trip_id, record)| {
            match Trip::from_record(user_id, &trip_id, record) {
                Ok(trip) => Some(TripSummary::from(&trip)),
                Err(e) => {
                    tracing::warn!(user_id, trip_id, error = %e, "Skipping malformed trip record");
                    None
                }
            }
        })
        .collect()
}

fn to_record<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.into()))
}

fn as_write_failure(err: AppError) -> AppError {
    match err {
        AppError::StoreWrite(_) => err,
        other => AppError::StoreWrite(other.to_string()),
    }
}
