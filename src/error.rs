// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::db::StorageError;
use crate::services::geolocation::GeolocationError;

/// A single rejected form field and why it was rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: &str, reason: &str) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {}", describe_fields(.0))]
    InvalidInput(Vec<FieldError>),

    #[error("Duplicate workout id: {0}")]
    DuplicateId(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Map unavailable: {0}")]
    MapUnavailable(String),

    #[error("No map location selected")]
    NoPendingLocation,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

fn describe_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{} {}", f.field, f.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

impl AppError {
    /// Fields rejected by validation, empty for every other error.
    pub fn invalid_fields(&self) -> &[FieldError] {
        match self {
            AppError::InvalidInput(fields) => fields,
            _ => &[],
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<GeolocationError> for AppError {
    fn from(err: GeolocationError) -> Self {
        AppError::MapUnavailable(err.to_string())
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<FieldError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::InvalidInput(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_input",
                Some(self.to_string()),
            ),
            AppError::DuplicateId(id) => (StatusCode::CONFLICT, "duplicate_id", Some(id.clone())),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::MapUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "map_unavailable",
                Some(msg.clone()),
            ),
            AppError::NoPendingLocation => (StatusCode::CONFLICT, "no_pending_location", None),
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let fields = match self {
            AppError::InvalidInput(fields) => Some(fields),
            _ => None,
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
            fields,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
