// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Proxy routes: attraction search, attraction detail and weather.
//!
//! Each route validates its query, forwards to the upstream with the API
//! key attached, and passes the result back. Keys never appear in a
//! response.

use crate::error::{AppError, Result};
use crate::models::WeatherReport;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/search", get(search))
        .route("/detail", get(detail))
        .route("/weather", get(weather))
}

// ─── Attractions ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Value>> {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing search query".to_string()))?;

    tracing::debug!(query, "Forwarding attraction search");
    Ok(Json(state.tripadvisor.search(query).await?))
}

#[derive(Debug, Deserialize)]
struct DetailQuery {
    location_id: Option<String>,
}

async fn detail(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DetailQuery>,
) -> Result<Json<Value>> {
    let location_id = params
        .location_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing location_id".to_string()))?;

    tracing::debug!(location_id, "Forwarding attraction detail");
    Ok(Json(state.tripadvisor.details(location_id).await?))
}

// ─── Weather ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    lat: Option<String>,
    lon: Option<String>,
}

async fn weather(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WeatherQuery>,
) -> Result<Json<WeatherReport>> {
    let (Some(lat), Some(lon)) = (
        parse_coordinate(params.lat.as_deref()),
        parse_coordinate(params.lon.as_deref()),
    ) else {
        return Err(AppError::BadRequest("Missing coordinates".to_string()));
    };

    Ok(Json(state.openweather.current(lat, lon).await?))
}

fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    raw?.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate(Some(" 48.8584 ")), Some(48.8584));
        assert_eq!(parse_coordinate(Some("-122.1")), Some(-122.1));
        assert_eq!(parse_coordinate(Some("")), None);
        assert_eq!(parse_coordinate(Some("north")), None);
        assert_eq!(parse_coordinate(Some("NaN")), None);
        assert_eq!(parse_coordinate(None), None);
    }
}
