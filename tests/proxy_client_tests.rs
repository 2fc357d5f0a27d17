// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Attractions provider client against an in-process fake proxy.

use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use trip_planner::config::ClientConfig;
use trip_planner::error::AppError;
use trip_planner::services::{AttractionsProvider, PlaceResolver, ProxyClient};

mod common;

async fn fake_search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let q = params.get("q").cloned().unwrap_or_default();
    Json(json!({
        "data": [
            {
                "location_id": "188151",
                "name": format!("{} result", q),
                "address_obj": { "address_string": "Av. Gustave Eiffel, Paris" }
            }
        ]
    }))
}

async fn fake_detail(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("location_id").map(String::as_str) {
        Some("188151") => Json(json!({
            "location_id": "188151",
            "name": "Eiffel Tower",
            "latitude": "48.858353",
            "longitude": "2.294464"
        }))
        .into_response(),
        Some("nulled") => Json(Value::Null).into_response(),
        Some("errored") => Json(json!({ "error": { "message": "Invalid location" } })).into_response(),
        Some("broken") => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        Some("slow") => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({})).into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn fake_weather() -> Json<Value> {
    Json(json!({
        "temperature": 18.5,
        "feelsLike": 17.9,
        "condition": "Clouds",
        "humidity": 72,
        "windSpeed": 4.1,
        "icon": "clouds",
        "location": "Paris, FR"
    }))
}

async fn client() -> ProxyClient {
    let app = Router::new()
        .route("/search", get(fake_search))
        .route("/detail", get(fake_detail))
        .route("/weather", get(fake_weather));
    let base_url = common::spawn_server(app).await;

    ProxyClient::new(&ClientConfig {
        proxy_url: base_url,
        provider_timeout: Duration::from_secs(1),
        ..ClientConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_search_normalizes_hits() {
    let client = client().await;

    let places = client.search("  eiffel ").await.unwrap();
    assert_eq!(places.len(), 1);
    assert_eq!(places[0].id, "188151");
    assert_eq!(places[0].name, "eiffel result", "query is trimmed before sending");
    assert_eq!(places[0].description, "Av. Gustave Eiffel, Paris");
    assert_eq!(places[0].category.as_deref(), Some("Unknown"));
    assert!(!places[0].is_resolved());
}

#[tokio::test]
async fn test_detail_and_resolve() {
    let client = client().await;

    let detail = client.fetch_detail("188151").await.unwrap();
    assert_eq!(detail.name().as_deref(), Some("Eiffel Tower"));

    let resolver = PlaceResolver::new(std::sync::Arc::new(client));
    let hit = trip_planner::models::Place::new("188151", "Eiffel Tower");
    let place = resolver.resolve(hit).await.unwrap();
    assert_eq!(place.latitude, Some(48.858353));
    assert_eq!(place.longitude, Some(2.294464));
}

#[tokio::test]
async fn test_detail_not_found_variants() {
    let client = client().await;

    for id in ["unknown", "nulled", "errored"] {
        assert!(
            matches!(client.fetch_detail(id).await, Err(AppError::NotFound(_))),
            "{} should be NotFound",
            id
        );
    }
}

#[tokio::test]
async fn test_detail_server_error_is_unavailable() {
    let client = client().await;
    assert!(matches!(
        client.fetch_detail("broken").await,
        Err(AppError::ProviderUnavailable(_))
    ));
}

#[tokio::test]
async fn test_detail_timeout_is_unavailable() {
    let client = client().await;
    assert!(matches!(
        client.fetch_detail("slow").await,
        Err(AppError::ProviderUnavailable(_))
    ));
}

#[tokio::test]
async fn test_unreachable_proxy_is_unavailable() {
    let client = ProxyClient::new(&ClientConfig {
        proxy_url: "http://127.0.0.1:9".to_string(),
        provider_timeout: Duration::from_secs(1),
        ..ClientConfig::default()
    })
    .unwrap();

    assert!(matches!(
        client.search("eiffel").await,
        Err(AppError::ProviderUnavailable(_))
    ));
}

#[tokio::test]
async fn test_weather() {
    let client = client().await;

    let report = client.fetch_weather(48.8584, 2.2945).await.unwrap();
    assert_eq!(report.condition, "Clouds");
    assert_eq!(report.location, "Paris, FR");
    assert_eq!(report.humidity, 72.0);
}

#[tokio::test]
async fn test_missing_route_is_unavailable_not_missing_record() {
    // A proxy that only knows /detail, as when the base URL points elsewhere
    let app = Router::new().route("/detail", get(fake_detail));
    let base_url = common::spawn_server(app).await;
    let client = ProxyClient::new(&ClientConfig {
        proxy_url: base_url,
        provider_timeout: Duration::from_secs(1),
        ..ClientConfig::default()
    })
    .unwrap();

    let search = client.search("eiffel").await;
    assert!(
        matches!(search, Err(AppError::ProviderUnavailable(_))),
        "search 404 should be unavailable, got {:?}",
        search
    );
    let weather = client.fetch_weather(48.8584, 2.2945).await;
    assert!(
        matches!(weather, Err(AppError::ProviderUnavailable(_))),
        "weather 404 should be unavailable, got {:?}",
        weather
    );

    // Detail keeps its own not-found mapping
    assert!(matches!(
        client.fetch_detail("unknown").await,
        Err(AppError::NotFound(_))
    ));
}
