// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use trip_planner::config::Config;
use trip_planner::db::{MemoryStore, Subscription, TreeStore};
use trip_planner::error::{AppError, Result};
use trip_planner::models::{Place, ProviderDetail, WeatherReport};
use trip_planner::routes::create_router;
use trip_planner::services::AttractionsProvider;
use trip_planner::AppState;

/// Create a test app whose upstreams point at a closed port.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Config::default())
}

#[allow(dead_code)]
pub fn create_test_app_with(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config).expect("Failed to build app state"));
    (create_router(state.clone()), state)
}

/// Serve `app` on an ephemeral local port and return its base URL.
#[allow(dead_code)]
pub async fn spawn_server(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}", addr)
}

// ─── Attractions provider double ─────────────────────────────

/// Scripted response for one place id.
#[allow(dead_code)]
#[derive(Clone)]
pub enum Scripted {
    Detail(Value),
    Missing,
    Unavailable,
}

/// Provider that answers from a script and counts detail lookups.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeProvider {
    details: Mutex<HashMap<String, Scripted>>,
    search_results: Mutex<Vec<Place>>,
    detail_calls: AtomicUsize,
    /// When set, detail lookups wait for a permit before answering.
    gate: Option<Arc<Notify>>,
}

#[allow(dead_code)]
impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn with_detail(self, place_id: &str, detail: Value) -> Self {
        self.script(place_id, Scripted::Detail(detail))
    }

    pub fn script(self, place_id: &str, response: Scripted) -> Self {
        self.details
            .lock()
            .unwrap()
            .insert(place_id.to_string(), response);
        self
    }

    pub fn with_search_results(self, places: Vec<Place>) -> Self {
        *self.search_results.lock().unwrap() = places;
        self
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AttractionsProvider for FakeProvider {
    async fn search(&self, query: &str) -> Result<Vec<Place>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.search_results.lock().unwrap().clone())
    }

    async fn fetch_detail(&self, place_id: &str) -> Result<ProviderDetail> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let scripted = self.details.lock().unwrap().get(place_id).cloned();
        match scripted {
            Some(Scripted::Detail(value)) => Ok(ProviderDetail::new(value)),
            Some(Scripted::Unavailable) => Err(AppError::ProviderUnavailable("scripted outage".to_string())),
            Some(Scripted::Missing) | None => Err(AppError::NotFound(place_id.to_string())),
        }
    }

    async fn fetch_weather(&self, _latitude: f64, _longitude: f64) -> Result<WeatherReport> {
        Err(AppError::ProviderUnavailable("weather not scripted".to_string()))
    }
}

// ─── Store double ────────────────────────────────────────────

/// Memory store that counts writes, can fail the Nth one, and does not
/// offer multi-path updates (so callers take the sequential path).
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    writes: Arc<AtomicUsize>,
    fail_on_write: Option<usize>,
}

#[allow(dead_code)]
impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `n`th write (1-based) with a store write error.
    pub fn failing_on_write(n: usize) -> Self {
        Self {
            fail_on_write: Some(n),
            ..Self::default()
        }
    }

    pub fn with_root(root: Value) -> Self {
        Self {
            inner: MemoryStore::with_root(root),
            ..Self::default()
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn record_write(&self) -> Result<()> {
        let n = self.writes.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_write == Some(n) {
            return Err(AppError::StoreWrite(format!("scripted failure on write {}", n)));
        }
        Ok(())
    }
}

#[async_trait]
impl TreeStore for CountingStore {
    async fn get(&self, path: &str) -> Result<Option<Value>> {
        self.inner.get(path).await
    }

    async fn set(&self, path: &str, value: Value) -> Result<()> {
        self.record_write()?;
        self.inner.set(path, value).await
    }

    async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<()> {
        self.record_write()?;
        self.inner.update(path, fields).await
    }

    async fn push(&self, path: &str, value: Value) -> Result<String> {
        self.record_write()?;
        self.inner.push(path, value).await
    }

    async fn remove(&self, path: &str) -> Result<()> {
        self.record_write()?;
        self.inner.remove(path).await
    }

    async fn subscribe(&self, path: &str) -> Result<Subscription<Option<Value>>> {
        self.inner.subscribe(path).await
    }
}

// ─── Clock ───────────────────────────────────────────────────

/// Clock that starts at `start` and advances one second per reading.
#[allow(dead_code)]
pub fn stepping_clock(start: DateTime<Utc>) -> impl Fn() -> DateTime<Utc> + Send + Sync + 'static {
    let ticks = AtomicI64::new(0);
    move || start + Duration::seconds(ticks.fetch_add(1, Ordering::SeqCst))
}

#[allow(dead_code)]
pub fn test_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap()
}
