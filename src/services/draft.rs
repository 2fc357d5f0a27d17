// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory working state for the trip being edited.

use crate::models::{Place, Trip};

/// Whether the draft holds any places yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    Empty,
    Populated,
}

/// Result of [`TripDraft::add_place`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The place id is already in the draft; nothing changed.
    AlreadyAdded { place_id: String },
}

impl AddOutcome {
    /// Notice to show the user, if any.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            AddOutcome::Added => None,
            AddOutcome::AlreadyAdded { .. } => Some("This place is already in your trip."),
        }
    }
}

/// Pending removal of one place. Obtained from
/// [`TripDraft::request_removal`]; only applied once the user confirms.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a removal request does nothing until applied"]
pub struct RemovalRequest {
    place_id: String,
    place_name: String,
}

impl RemovalRequest {
    pub fn place_id(&self) -> &str {
        &self.place_id
    }

    /// Confirmation prompt for the user.
    pub fn prompt(&self) -> String {
        format!("Remove \"{}\" from this trip?", self.place_name)
    }
}

/// Ordered set of places plus the trip's title and general notes.
///
/// Insertion order is display and save order. The draft stays editable
/// after it has been saved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripDraft {
    title: String,
    general_notes: String,
    places: Vec<Place>,
}

impl TripDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a draft from a persisted trip (editing an existing trip).
    pub fn from_trip(trip: &Trip) -> Self {
        Self {
            title: trip.title.clone(),
            general_notes: trip.notes.clone(),
            places: trip.places.iter().map(|p| p.to_place()).collect(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn general_notes(&self) -> &str {
        &self.general_notes
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn contains(&self, place_id: &str) -> bool {
        self.places.iter().any(|p| p.id == place_id)
    }

    pub fn state(&self) -> DraftState {
        if self.places.is_empty() {
            DraftState::Empty
        } else {
            DraftState::Populated
        }
    }

    /// Append a place unless its id is already present.
    pub fn add_place(&mut self, place: Place) -> AddOutcome {
        if self.contains(&place.id) {
            tracing::debug!(place_id = %place.id, "Duplicate place ignored");
            return AddOutcome::AlreadyAdded { place_id: place.id };
        }
        self.places.push(place);
        AddOutcome::Added
    }

    /// Ask to remove a place; `None` if it is not in the draft.
    pub fn request_removal(&self, place_id: &str) -> Option<RemovalRequest> {
        self.places
            .iter()
            .find(|p| p.id == place_id)
            .map(|p| RemovalRequest {
                place_id: p.id.clone(),
                place_name: p.name.clone(),
            })
    }

    /// Apply a confirmed removal and return the removed place.
    pub fn apply_removal(&mut self, request: RemovalRequest) -> Option<Place> {
        let index = self.places.iter().position(|p| p.id == request.place_id)?;
        Some(self.places.remove(index))
    }

    /// Replace the notes of one place. Returns `false` if it is not present.
    pub fn update_notes(&mut self, place_id: &str, text: impl Into<String>) -> bool {
        match self.places.iter_mut().find(|p| p.id == place_id) {
            Some(place) => {
                place.notes = text.into();
                true
            }
            None => false,
        }
    }

    pub fn set_title(&mut self, text: impl Into<String>) {
        self.title = text.into();
    }

    pub fn set_general_notes(&mut self, text: impl Into<String>) {
        self.general_notes = text.into();
    }
}
