// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Trip Planner: search attractions, build trips, and share them.
//!
//! This crate provides the trip-planning core (place resolution, drafts,
//! persistence to a realtime tree store, the shared-trips feed) and the
//! proxy server that fronts the attractions and weather APIs.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::{ClientConfig, Config};
use db::{RealtimeDb, TreeStore};
use error::Result;
use services::{
    AttractionsProvider, OpenWeatherClient, PlaceResolver, ProxyClient, TripAdvisorClient,
    TripEditor, TripFeed, TripStore,
};
use std::sync::Arc;

/// Shared proxy server state.
pub struct AppState {
    pub config: Config,
    pub tripadvisor: TripAdvisorClient,
    pub openweather: OpenWeatherClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            tripadvisor: TripAdvisorClient::new(&config)?,
            openweather: OpenWeatherClient::new(&config)?,
            config,
        })
    }
}

/// Handles for one signed-in user's session of the trip core.
///
/// Built once at startup and passed to whatever drives the UI. The resolver
/// memo lives here, so it spans every editor opened in the session.
#[derive(Clone)]
pub struct AppContext {
    pub provider: Arc<dyn AttractionsProvider>,
    pub resolver: PlaceResolver,
    pub trips: TripStore,
    pub feed: TripFeed,
    pub user_id: String,
}

impl AppContext {
    pub fn new(
        provider: Arc<dyn AttractionsProvider>,
        store: Arc<dyn TreeStore>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            resolver: PlaceResolver::new(provider.clone()),
            trips: TripStore::new(store.clone()),
            feed: TripFeed::new(store),
            provider,
            user_id: user_id.into(),
        }
    }

    /// Context backed by the proxy and the Realtime Database.
    pub fn from_config(config: &ClientConfig, user_id: impl Into<String>) -> Result<Self> {
        let provider = Arc::new(ProxyClient::new(config)?);
        let store = Arc::new(RealtimeDb::new(config)?);
        tracing::info!(database = %config.database_url, "Trip core connected");
        Ok(Self::new(provider, store, user_id))
    }

    /// Start editing a new trip.
    pub fn editor(&self) -> TripEditor {
        TripEditor::new(self.resolver.clone(), self.trips.clone(), self.user_id.clone())
    }

    /// Resume editing one of this user's saved trips.
    pub async fn open_trip(&self, trip_id: &str) -> Result<TripEditor> {
        TripEditor::open(
            self.resolver.clone(),
            self.trips.clone(),
            self.user_id.clone(),
            trip_id,
        )
        .await
    }
}
