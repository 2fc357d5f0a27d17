// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod attractions;
pub mod draft;
pub mod editor;
pub mod feed;
pub mod resolver;
pub mod trips;
pub mod upstream;

pub use attractions::{AttractionsProvider, ProxyClient, SEARCH_DEBOUNCE};
pub use draft::{AddOutcome, DraftState, RemovalRequest, TripDraft};
pub use editor::TripEditor;
pub use feed::TripFeed;
pub use resolver::PlaceResolver;
pub use trips::{Clock, DeleteRequest, TripStore};
pub use upstream::{OpenWeatherClient, TripAdvisorClient};
