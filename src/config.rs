// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Two halves: [`Config`] for the proxy server, which holds the upstream API
//! keys, and [`ClientConfig`] for the trip core, which only needs to know
//! where the proxy and the realtime database live.

use std::env;
use std::time::Duration;

const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 15;

/// Proxy server configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// TripAdvisor content API base URL
    pub tripadvisor_base_url: String,
    /// Language passed to TripAdvisor lookups
    pub tripadvisor_language: String,
    /// Currency passed to TripAdvisor detail lookups
    pub tripadvisor_currency: String,
    /// OpenWeather API base URL
    pub openweather_base_url: String,
    /// Timeout applied to every upstream call
    pub upstream_timeout: Duration,

    // --- Secrets ---
    /// TripAdvisor content API key
    pub tripadvisor_api_key: String,
    /// OpenWeather API key
    pub openweather_api_key: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 4000,
            tripadvisor_base_url: "http://127.0.0.1:9/tripadvisor".to_string(),
            tripadvisor_language: "en".to_string(),
            tripadvisor_currency: "HKD".to_string(),
            openweather_base_url: "http://127.0.0.1:9/openweather".to_string(),
            upstream_timeout: Duration::from_secs(2),
            tripadvisor_api_key: "test_tripadvisor_key".to_string(),
            openweather_api_key: "test_openweather_key".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .unwrap_or(4000),
            tripadvisor_base_url: env::var("TRIPADVISOR_BASE_URL")
                .unwrap_or_else(|_| "https://api.content.tripadvisor.com/api/v1".to_string()),
            tripadvisor_language: env::var("TRIPADVISOR_LANGUAGE")
                .unwrap_or_else(|_| "en".to_string()),
            tripadvisor_currency: env::var("TRIPADVISOR_CURRENCY")
                .unwrap_or_else(|_| "HKD".to_string()),
            openweather_base_url: env::var("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|_| "https://api.openweathermap.org/data/2.5".to_string()),
            upstream_timeout: timeout_from_env("UPSTREAM_TIMEOUT_SECS"),

            tripadvisor_api_key: env::var("TRIPADVISOR_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("TRIPADVISOR_API_KEY"))?,
            openweather_api_key: env::var("OPENWEATHER_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("OPENWEATHER_API_KEY"))?,
        })
    }
}

/// Trip core configuration: where to find the proxy and the tree store.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the attractions/weather proxy
    pub proxy_url: String,
    /// Realtime Database root URL
    pub database_url: String,
    /// Optional database auth token (ID token or legacy secret)
    pub database_auth: Option<String>,
    /// Timeout for every provider call
    pub provider_timeout: Duration,
}

impl Default for ClientConfig {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            proxy_url: "http://127.0.0.1:4000".to_string(),
            database_url: "http://127.0.0.1:9000".to_string(),
            database_auth: None,
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Load client configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            proxy_url: env::var("PROXY_URL").unwrap_or_else(|_| "http://127.0.0.1:4000".to_string()),
            database_url: env::var("DATABASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            database_auth: env::var("DATABASE_AUTH")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            provider_timeout: timeout_from_env("PROVIDER_TIMEOUT_SECS"),
        })
    }
}

fn timeout_from_env(key: &str) -> Duration {
    let secs = env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|s| *s > 0)
        .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
