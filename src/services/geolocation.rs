// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Geolocation provider used once at startup to centre the map.

use std::future::Future;
use std::time::Duration;

use crate::models::Location;

/// Source of the user's current position.
pub trait GeolocationProvider {
    fn request_position(&self) -> impl Future<Output = Result<Location, GeolocationError>> + Send;
}

/// Errors from position lookups.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeolocationError {
    #[error("Position permission denied")]
    PermissionDenied,

    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("Position request timed out after {0:?}")]
    Timeout(Duration),
}

/// Request a position, giving up after `timeout`.
pub async fn locate<G: GeolocationProvider>(
    provider: &G,
    timeout: Duration,
) -> Result<Location, GeolocationError> {
    tokio::time::timeout(timeout, provider.request_position())
        .await
        .unwrap_or(Err(GeolocationError::Timeout(timeout)))
}

/// Provider that reports a configured position, or fails when none is set.
#[derive(Debug, Clone)]
pub struct FixedPosition {
    position: Option<Location>,
}

impl FixedPosition {
    pub fn new(position: Option<Location>) -> Self {
        Self { position }
    }
}

impl GeolocationProvider for FixedPosition {
    async fn request_position(&self) -> Result<Location, GeolocationError> {
        self.position.ok_or_else(|| {
            GeolocationError::PositionUnavailable("no home position configured".to_string())
        })
    }
}
