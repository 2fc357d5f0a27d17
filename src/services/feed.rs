// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public feed of shared trips.

use crate::db::{paths, Subscription, TreeStore};
use crate::error::{AppError, Result};
use crate::models::{SharedTripSummary, Trip};
use crate::services::TripStore;
use serde_json::Value;
use std::sync::Arc;

/// Read-only view over `sharedTrips`.
#[derive(Clone)]
pub struct TripFeed {
    store: Arc<dyn TreeStore>,
    trips: TripStore,
}

impl TripFeed {
    pub fn new(store: Arc<dyn TreeStore>) -> Self {
        Self {
            trips: TripStore::new(store.clone()),
            store,
        }
    }

    /// Live feed, newest first. Each update replaces the whole list.
    pub async fn subscribe(&self) -> Result<Subscription<Vec<SharedTripSummary>>> {
        let subscription = self.store.subscribe(paths::SHARED_TRIPS).await?;
        Ok(subscription.map(shared_summaries))
    }

    /// Full trip behind a feed entry, read from the owner's private record.
    pub async fn fetch_full_trip(&self, summary: &SharedTripSummary) -> Result<Trip> {
        if summary.user_id.is_empty() {
            return Err(AppError::NotFound(format!(
                "Shared trip {} has no owner",
                summary.id
            )));
        }
        self.trips.load(&summary.user_id, &summary.id).await
    }
}

/// Decode a `sharedTrips` snapshot, newest first.
pub fn shared_summaries(snapshot: Option<Value>) -> Vec<SharedTripSummary> {
    let Some(Value::Object(records)) = snapshot else {
        return Vec::new();
    };

    let mut summaries: Vec<SharedTripSummary> = records
        .into_iter()
        .filter_map(|(trip_id, record)| {
            match serde_json::from_value::<SharedTripSummary>(record) {
                Ok(mut summary) => {
                    // The store key is authoritative for the id
                    summary.id = trip_id;
                    Some(summary)
                }
                Err(e) => {
                    tracing::warn!(trip_id, error = %e, "Skipping malformed shared trip");
                    None
                }
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_newest_first_with_defaults() {
        let snapshot = json!({
            "-Nold": { "title": "Old", "timestamp": 1000, "userId": "u1" },
            "-Nnew": { "title": "New", "timestamp": 2000, "likes": null },
            "-Nbad": "not a record"
        });

        let feed = shared_summaries(Some(snapshot));
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].id, "-Nnew");
        assert_eq!(feed[0].likes, 0);
        assert_eq!(feed[1].id, "-Nold");
        assert_eq!(feed[1].user_id, "u1");
    }
}
