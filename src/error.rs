// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Geocoding error: {0}")]
    Geocode(String),

    #[error("No route found: {0}")]
    NoRoute(String),

    #[error("Overpass API error: {0}")]
    Overpass(String),

    #[error("Graph cache error: {0}")]
    Cache(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
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
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::Geocode(msg) => (StatusCode::BAD_GATEWAY, "geocode_error", Some(msg.clone())),
            AppError::NoRoute(msg) => (StatusCode::NOT_FOUND, "no_route", Some(msg.clone())),
            AppError::Overpass(msg) => {
                (StatusCode::BAD_GATEWAY, "overpass_error", Some(msg.clone()))
            }
            AppError::Cache(msg) => {
                tracing::error!(error = %msg, "Graph cache error");
                (StatusCode::INTERNAL_SERVER_ERROR, "cache_error", None)
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

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

impl From<crate::services::GeocodeError> for AppError {
    fn from(err: crate::services::GeocodeError) -> Self {
        use crate::services::GeocodeError;
        match err {
            GeocodeError::EmptyQuery => AppError::BadRequest(err.to_string()),
            GeocodeError::NoMatch(_) => AppError::NotFound(err.to_string()),
            other => AppError::Geocode(other.to_string()),
        }
    }
}

impl From<crate::services::RouteError> for AppError {
    fn from(err: crate::services::RouteError) -> Self {
        AppError::NoRoute(err.to_string())
    }
}

impl From<crate::services::map_export::MapExportError> for AppError {
    fn from(err: crate::services::map_export::MapExportError) -> Self {
        AppError::Internal(anyhow::anyhow!(err.to_string()))
    }
}
