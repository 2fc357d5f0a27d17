// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One trip-editing session: a draft, the resolver that feeds it, and the
//! id of the persisted trip once it has been saved.
//!
//! Draft mutations go through one async mutex so they apply in issue order.
//! Background adds hold only a weak handle to the draft; if the editor is
//! dropped while a detail lookup is in flight, the result is discarded.

use crate::error::{AppError, Result};
use crate::models::{Author, Place, SharedTripSummary, Trip};
use crate::services::{AddOutcome, PlaceResolver, RemovalRequest, TripDraft, TripStore};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub struct TripEditor {
    draft: Arc<Mutex<TripDraft>>,
    resolver: PlaceResolver,
    trips: TripStore,
    user_id: String,
    trip_id: Option<String>,
}

impl TripEditor {
    /// Start editing a new, unsaved trip.
    pub fn new(resolver: PlaceResolver, trips: TripStore, user_id: impl Into<String>) -> Self {
        Self {
            draft: Arc::new(Mutex::new(TripDraft::new())),
            resolver,
            trips,
            user_id: user_id.into(),
            trip_id: None,
        }
    }

    /// Resume editing a saved trip. Later saves update it in place.
    pub async fn open(
        resolver: PlaceResolver,
        trips: TripStore,
        user_id: impl Into<String>,
        trip_id: &str,
    ) -> Result<Self> {
        let user_id = user_id.into();
        let trip = trips.load(&user_id, trip_id).await?;
        Ok(Self {
            draft: Arc::new(Mutex::new(TripDraft::from_trip(&trip))),
            resolver,
            trips,
            user_id,
            trip_id: Some(trip.id),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Id of the persisted trip, once saved or opened.
    pub fn trip_id(&self) -> Option<&str> {
        self.trip_id.as_deref()
    }

    /// Copy of the current draft.
    pub async fn draft(&self) -> TripDraft {
        self.draft.lock().await.clone()
    }

    // ─── Adding places ───────────────────────────────────────────

    /// Resolve a search hit and add it. Duplicates return
    /// [`AddOutcome::AlreadyAdded`] without a detail lookup.
    pub async fn add_hit(&self, hit: Place) -> Result<AddOutcome> {
        if self.draft.lock().await.contains(&hit.id) {
            return Ok(AddOutcome::AlreadyAdded { place_id: hit.id });
        }

        let place = self.resolver.resolve(hit).await?;
        Ok(self.draft.lock().await.add_place(place))
    }

    /// Like [`add_hit`](Self::add_hit), on a background task.
    ///
    /// Resolves to `Ok(None)` when the editor was dropped before the lookup
    /// finished.
    pub fn spawn_add(&self, hit: Place) -> JoinHandle<Result<Option<AddOutcome>>> {
        let draft = Arc::downgrade(&self.draft);
        let resolver = self.resolver.clone();

        tokio::spawn(async move {
            let place_id = hit.id.clone();
            match draft.upgrade() {
                Some(live) => {
                    if live.lock().await.contains(&place_id) {
                        return Ok(Some(AddOutcome::AlreadyAdded { place_id }));
                    }
                }
                None => return Ok(None),
            }

            let place = resolver.resolve(hit).await?;

            let Some(live) = draft.upgrade() else {
                tracing::debug!(place_id, "Editor closed before place resolved, dropping result");
                return Ok(None);
            };
            let outcome = live.lock().await.add_place(place);
            Ok(Some(outcome))
        })
    }

    // ─── Editing ─────────────────────────────────────────────────

    pub async fn request_removal(&self, place_id: &str) -> Option<RemovalRequest> {
        self.draft.lock().await.request_removal(place_id)
    }

    pub async fn apply_removal(&self, request: RemovalRequest) -> Option<Place> {
        self.draft.lock().await.apply_removal(request)
    }

    pub async fn update_notes(&self, place_id: &str, text: impl Into<String>) -> bool {
        self.draft.lock().await.update_notes(place_id, text)
    }

    pub async fn set_title(&self, text: impl Into<String>) {
        self.draft.lock().await.set_title(text);
    }

    pub async fn set_general_notes(&self, text: impl Into<String>) {
        self.draft.lock().await.set_general_notes(text);
    }

    // ─── Persistence ─────────────────────────────────────────────

    /// Save the draft; the first save creates the trip, later ones update it.
    pub async fn save(&mut self) -> Result<Trip> {
        let snapshot = self.draft().await;
        let trip = self
            .trips
            .save(&self.user_id, &snapshot, self.trip_id.as_deref())
            .await?;
        self.trip_id = Some(trip.id.clone());
        Ok(trip)
    }

    /// Share the saved trip on the public feed.
    pub async fn publish(&self, author: &Author) -> Result<SharedTripSummary> {
        let Some(trip_id) = self.trip_id.as_deref() else {
            return Err(AppError::Validation(
                "Please save the trip before sharing it.".to_string(),
            ));
        };
        let trip = self.trips.load(&self.user_id, trip_id).await?;
        self.trips.publish(&trip, author).await
    }
}
