// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type shared by the trip core and the proxy server.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Local precondition failure; never reaches the store.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Attractions provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Detail lookup succeeded but carried no usable coordinates.
    #[error("no location data for place {0}")]
    NoLocationData(String),

    #[error("Store read failed: {0}")]
    StoreRead(String),

    #[error("Store write failed: {0}")]
    StoreWrite(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Short human-readable message suitable for an alert dialog.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Please give your trip a name and add at least one place.",
            AppError::ProviderUnavailable(_) => "Unable to reach the attractions service.",
            AppError::NotFound(_) => "We couldn't find what you were looking for.",
            AppError::NoLocationData(_) => "This place has no location info.",
            AppError::StoreRead(_) => "Unable to load your trips. Please try again.",
            AppError::StoreWrite(_) => "Unable to save trip. Please try again.",
            AppError::BadRequest(_) => "That request wasn't valid.",
            AppError::Internal(_) => "Something went wrong.",
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Validation(msg) | AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::NoLocationData(id) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "no_location_data",
                Some(id.clone()),
            ),
            AppError::ProviderUnavailable(msg) => {
                tracing::warn!(error = %msg, "Upstream provider failure");
                (StatusCode::BAD_GATEWAY, "provider_unavailable", None)
            }
            AppError::StoreRead(msg) | AppError::StoreWrite(msg) => {
                tracing::error!(error = %msg, "Store error");
                (StatusCode::INTERNAL_SERVER_ERROR, "store_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, AppError>;
