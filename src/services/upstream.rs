// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Upstream API clients used by the proxy server.
//!
//! Handles:
//! - TripAdvisor content API location search and details
//! - OpenWeather current conditions, reshaped into [`WeatherReport`]
//!
//! API keys are added here and never leave the proxy.

use crate::config::Config;
use crate::error::AppError;
use crate::models::WeatherReport;
use serde::Deserialize;
use serde_json::Value;

fn build_http(config: &Config) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .build()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))
}

/// TripAdvisor content API client.
#[derive(Clone)]
pub struct TripAdvisorClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
    currency: String,
}

impl TripAdvisorClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            http: build_http(config)?,
            base_url: config.tripadvisor_base_url.trim_end_matches('/').to_string(),
            api_key: config.tripadvisor_api_key.clone(),
            language: config.tripadvisor_language.clone(),
            currency: config.tripadvisor_currency.clone(),
        })
    }

    /// Keyword search restricted to attractions. Body is passed through.
    pub async fn search(&self, query: &str) -> Result<Value, AppError> {
        let url = format!("{}/location/search", self.base_url);
        self.get_json(
            &url,
            &[
                ("key", self.api_key.as_str()),
                ("language", self.language.as_str()),
                ("searchQuery", query),
                ("category", "attractions"),
            ],
        )
        .await
    }

    /// Full location record. Body is passed through.
    pub async fn details(&self, location_id: &str) -> Result<Value, AppError> {
        let url = format!(
            "{}/location/{}/details",
            self.base_url,
            urlencoding::encode(location_id)
        );
        self.get_json(
            &url,
            &[
                ("key", self.api_key.as_str()),
                ("language", self.language.as_str()),
                ("currency", self.currency.as_str()),
                ("category", "attractions"),
            ],
        )
        .await
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, AppError> {
        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| {
                AppError::ProviderUnavailable(format!("TripAdvisor request failed: {}", e.without_url()))
            })?;

        check_response_json(response, "TripAdvisor").await
    }
}

/// OpenWeather current-conditions client.
#[derive(Clone)]
pub struct OpenWeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            http: build_http(config)?,
            base_url: config.openweather_base_url.trim_end_matches('/').to_string(),
            api_key: config.openweather_api_key.clone(),
        })
    }

    /// Current weather at a coordinate, in metric units.
    pub async fn current(&self, lat: f64, lon: f64) -> Result<WeatherReport, AppError> {
        let url = format!("{}/weather", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::ProviderUnavailable(format!("OpenWeather request failed: {}", e.without_url()))
            })?;

        let body: OpenWeatherResponse = check_response_json(response, "OpenWeather").await?;
        body.into_report()
    }
}

/// Check response status and parse the JSON body.
///
/// 404 becomes [`AppError::NotFound`]; any other failure is reported as the
/// upstream being unavailable.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
    upstream: &str,
) -> Result<T, AppError> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(AppError::NotFound(format!("{} has no such record", upstream)));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(upstream, "Upstream rate limit hit (429)");
        }
        return Err(AppError::ProviderUnavailable(format!(
            "{} HTTP {}: {}",
            upstream, status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::ProviderUnavailable(format!("{} JSON parse error: {}", upstream, e)))
}

/// Subset of the OpenWeather `/weather` response the widget uses.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenWeatherResponse {
    pub main: OpenWeatherMain,
    #[serde(default)]
    pub weather: Vec<OpenWeatherCondition>,
    pub wind: OpenWeatherWind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sys: OpenWeatherSys,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenWeatherMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenWeatherCondition {
    pub main: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenWeatherWind {
    pub speed: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenWeatherSys {
    #[serde(default)]
    pub country: String,
}

impl OpenWeatherResponse {
    pub fn into_report(self) -> Result<WeatherReport, AppError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .map(|w| w.main)
            .ok_or_else(|| {
                AppError::ProviderUnavailable("OpenWeather response has no conditions".to_string())
            })?;

        Ok(WeatherReport {
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            icon: condition.to_lowercase(),
            condition,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            location: format!("{}, {}", self.name, self.sys.country),
        })
    }
}
