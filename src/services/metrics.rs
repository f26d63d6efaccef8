// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived workout metrics.
//!
//! Pure functions over raw workout fields. Derived values are rounded to one
//! decimal place; raw inputs are never rounded.

use chrono::{DateTime, Utc};

use crate::models::WorkoutKind;
use crate::time_utils::format_month_day;

/// Round to one decimal place.
///
/// Values too large to scale are already whole and are returned as is.
pub fn round1(value: f64) -> f64 {
    let scaled = value * 10.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 10.0
}

/// Running pace in minutes per kilometre.
pub fn pace_min_per_km(distance_km: f64, duration_min: f64) -> f64 {
    round1(duration_min / distance_km)
}

/// Cycling speed in kilometres per hour.
pub fn speed_km_per_hr(distance_km: f64, duration_min: f64) -> f64 {
    round1(distance_km / (duration_min / 60.0))
}

/// Human readable description, e.g. "Running on April 14".
pub fn describe(kind: WorkoutKind, created_at: DateTime<Utc>) -> String {
    format!("{} on {}", kind.label(), format_month_day(created_at))
}
