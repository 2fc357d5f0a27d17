// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trip draft editing behavior.

use trip_planner::models::Place;
use trip_planner::services::{AddOutcome, DraftState, TripDraft};

fn resolved(id: &str, name: &str) -> Place {
    Place::new(id, name).with_coordinates(34.9671, 135.7727)
}

#[test]
fn test_new_draft_is_empty() {
    let draft = TripDraft::new();
    assert_eq!(draft.state(), DraftState::Empty);
    assert!(draft.places().is_empty());
    assert_eq!(draft.title(), "");
    assert_eq!(draft.general_notes(), "");
}

#[test]
fn test_duplicate_add_is_idempotent() {
    let mut draft = TripDraft::new();
    assert_eq!(draft.add_place(resolved("p1", "Fushimi Inari")), AddOutcome::Added);

    let before = draft.clone();
    let outcome = draft.add_place(resolved("p1", "Fushimi Inari (again)"));

    assert_eq!(
        outcome,
        AddOutcome::AlreadyAdded {
            place_id: "p1".to_string()
        }
    );
    assert_eq!(outcome.notice(), Some("This place is already in your trip."));
    assert_eq!(draft, before, "duplicate add must not change the draft");
    assert_eq!(draft.state(), DraftState::Populated);
}

#[test]
fn test_insertion_order_is_kept() {
    let mut draft = TripDraft::new();
    for (id, name) in [("p3", "Kinkaku-ji"), ("p1", "Fushimi Inari"), ("p2", "Arashiyama")] {
        draft.add_place(resolved(id, name));
    }

    let ids: Vec<&str> = draft.places().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p3", "p1", "p2"]);
}

#[test]
fn test_removal_requires_confirmation_token() {
    let mut draft = TripDraft::new();
    draft.add_place(resolved("p1", "Fushimi Inari"));
    draft.add_place(resolved("p2", "Arashiyama"));

    let request = draft.request_removal("p1").expect("p1 is in the draft");
    assert_eq!(request.place_id(), "p1");
    // Asking does not remove
    assert!(draft.contains("p1"));

    let removed = draft.apply_removal(request).expect("removal applies");
    assert_eq!(removed.name, "Fushimi Inari");
    assert!(!draft.contains("p1"));
    assert_eq!(draft.places().len(), 1);
}

#[test]
fn test_removing_last_place_empties_draft() {
    let mut draft = TripDraft::new();
    draft.add_place(resolved("p1", "Fushimi Inari"));

    let request = draft.request_removal("p1").unwrap();
    draft.apply_removal(request);
    assert_eq!(draft.state(), DraftState::Empty);
}

#[test]
fn test_update_notes() {
    let mut draft = TripDraft::new();
    draft.add_place(resolved("p1", "Fushimi Inari"));

    assert!(draft.update_notes("p1", "Go at sunrise"));
    assert_eq!(draft.places()[0].notes, "Go at sunrise");
    assert!(!draft.update_notes("missing", "ignored"));
}

#[test]
fn test_title_and_general_notes() {
    let mut draft = TripDraft::new();
    draft.set_title("Kyoto");
    draft.set_general_notes("Bring a rail pass");

    assert_eq!(draft.title(), "Kyoto");
    assert_eq!(draft.general_notes(), "Bring a rail pass");
}

#[test]
fn test_readd_after_removal() {
    let mut draft = TripDraft::new();
    draft.add_place(resolved("p1", "Fushimi Inari"));
    let request = draft.request_removal("p1").unwrap();
    draft.apply_removal(request);

    assert_eq!(draft.add_place(resolved("p1", "Fushimi Inari")), AddOutcome::Added);
    assert!(draft.contains("p1"));
}
