// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Attractions provider client.
//!
//! Talks to the proxy's `/search`, `/detail` and `/weather` routes and
//! normalizes their responses into [`Place`], [`ProviderDetail`] and
//! [`WeatherReport`].

use crate::config::ClientConfig;
use crate::error::{AppError, Result};
use crate::models::{Place, ProviderDetail, WeatherReport};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Recommended quiet period before firing a keystroke-driven search.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

const UNKNOWN_CATEGORY: &str = "Unknown";

/// Source of attraction search results, place details and weather.
#[async_trait]
pub trait AttractionsProvider: Send + Sync {
    /// Search by keyword. Results carry no coordinates.
    async fn search(&self, query: &str) -> Result<Vec<Place>>;

    /// Full provider record for one place.
    async fn fetch_detail(&self, place_id: &str) -> Result<ProviderDetail>;

    /// Current weather at a coordinate.
    async fn fetch_weather(&self, latitude: f64, longitude: f64) -> Result<WeatherReport>;
}

/// HTTP client for the attractions/weather proxy.
#[derive(Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ProxyClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.provider_timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.proxy_url.trim_end_matches('/').to_string(),
            timeout: config.provider_timeout,
        })
    }

    /// GET a proxy route; transport failures and timeouts are
    /// [`AppError::ProviderUnavailable`].
    async fn send(&self, route: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let url = format!("{}/{}", self.base_url, route);

        self.http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::ProviderUnavailable(format!(
                        "{} timed out after {}s",
                        route,
                        self.timeout.as_secs()
                    ))
                } else {
                    AppError::ProviderUnavailable(e.to_string())
                }
            })
    }

    /// GET a proxy route and decode the JSON body. Any non-success status,
    /// 404 included, means the provider is unavailable.
    async fn get_json<T: DeserializeOwned>(&self, route: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self.send(route, query).await?;
        read_json(route, response).await
    }
}

async fn read_json<T: DeserializeOwned>(route: &str, response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::ProviderUnavailable(format!(
            "{} HTTP {}: {}",
            route, status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::ProviderUnavailable(format!("JSON parse error: {}", e)))
}

#[async_trait]
impl AttractionsProvider for ProxyClient {
    async fn search(&self, query: &str) -> Result<Vec<Place>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let body: Value = self.get_json("search", &[("q", query.to_string())]).await?;
        let places = places_from_search(&body);
        tracing::debug!(query, count = places.len(), "Attraction search complete");
        Ok(places)
    }

    async fn fetch_detail(&self, place_id: &str) -> Result<ProviderDetail> {
        let response = self
            .send("detail", &[("location_id", place_id.to_string())])
            .await?;
        // Only a detail lookup can name a record that does not exist
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("No provider record for {}", place_id)));
        }
        let body: Value = read_json("detail", response).await?;

        if body.is_null() || body.get("error").is_some_and(|e| !e.is_null()) {
            return Err(AppError::NotFound(format!("No provider record for {}", place_id)));
        }
        Ok(ProviderDetail::new(body))
    }

    async fn fetch_weather(&self, latitude: f64, longitude: f64) -> Result<WeatherReport> {
        self.get_json(
            "weather",
            &[("lat", latitude.to_string()), ("lon", longitude.to_string())],
        )
        .await
    }
}

/// Normalize a `{ data: [...] }` search body into unresolved places.
///
/// Hits without a location id cannot be resolved later and are skipped.
pub fn places_from_search(body: &Value) -> Vec<Place> {
    let Some(hits) = body.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };

    hits.iter()
        .filter_map(|hit| {
            let id = match hit.get("location_id")? {
                Value::String(s) if !s.is_empty() => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            let name = hit
                .get("name")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or(crate::models::trip::UNKNOWN_PLACE);
            let description = hit
                .get("address_obj")
                .and_then(|a| a.get("address_string"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            let category = hit
                .get("result_type")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or(UNKNOWN_CATEGORY);

            Some(
                Place::new(id, name)
                    .with_description(description)
                    .with_category(category),
            )
        })
        .collect()
}
