// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Map coordinates.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::FieldError;

/// A point on the map in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Bring a longitude outside [-180, 180] back into range.
    ///
    /// In-range and non-finite values are returned unchanged.
    pub fn wrap_lng(self) -> Self {
        if !self.lng.is_finite() || (-180.0..=180.0).contains(&self.lng) {
            return self;
        }
        Self {
            lat: self.lat,
            lng: (self.lng + 180.0).rem_euclid(360.0) - 180.0,
        }
    }

    /// Check that both coordinates are finite and within WGS84 bounds.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            errors.push(FieldError::new("lat", "must be between -90 and 90"));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            errors.push(FieldError::new("lng", "must be between -180 and 180"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<[f64; 2]> for Location {
    /// `[lat, lng]`, the order map widgets use for coordinate pairs.
    fn from(coords: [f64; 2]) -> Self {
        Self::new(coords[0], coords[1])
    }
}
