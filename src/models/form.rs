// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Raw workout form fields and their validation.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::FieldError;
use crate::models::{WorkoutDetails, WorkoutKind};

/// Raw form submission.
///
/// Numeric fields accept JSON numbers or strings. A string that does not
/// parse becomes NaN and is rejected by [`WorkoutForm::validate`]; an empty
/// string counts as missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutForm {
    #[serde(alias = "type")]
    pub kind: WorkoutKind,
    #[serde(default, alias = "distance", deserialize_with = "lenient_number")]
    pub distance_km: Option<f64>,
    #[serde(default, alias = "duration", deserialize_with = "lenient_number")]
    pub duration_min: Option<f64>,
    #[serde(default, alias = "cadence", deserialize_with = "lenient_number")]
    pub cadence_spm: Option<f64>,
    #[serde(default, alias = "elevation", deserialize_with = "lenient_number")]
    pub elevation_gain_m: Option<f64>,
}

/// Validated workout input; only [`WorkoutForm::validate`] creates one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutInput {
    pub(crate) distance_km: f64,
    pub(crate) duration_min: f64,
    pub(crate) details: WorkoutDetails,
}

impl WorkoutForm {
    pub fn running(distance_km: f64, duration_min: f64, cadence_spm: f64) -> Self {
        Self {
            kind: WorkoutKind::Running,
            distance_km: Some(distance_km),
            duration_min: Some(duration_min),
            cadence_spm: Some(cadence_spm),
            elevation_gain_m: None,
        }
    }

    pub fn cycling(distance_km: f64, duration_min: f64, elevation_gain_m: f64) -> Self {
        Self {
            kind: WorkoutKind::Cycling,
            distance_km: Some(distance_km),
            duration_min: Some(duration_min),
            cadence_spm: None,
            elevation_gain_m: Some(elevation_gain_m),
        }
    }

    /// Validate every field, collecting all failures.
    ///
    /// Distance, duration and cadence must be finite and strictly positive;
    /// cadence must also be whole. Elevation gain only has to be finite.
    /// Fields belonging to the other kind are ignored.
    pub fn validate(&self) -> Result<WorkoutInput, Vec<FieldError>> {
        let mut errors = Vec::new();

        let distance_km = positive(&mut errors, "distance_km", self.distance_km);
        let duration_min = positive(&mut errors, "duration_min", self.duration_min);
        let details = match self.kind {
            WorkoutKind::Running => cadence(&mut errors, self.cadence_spm)
                .map(|cadence_spm| WorkoutDetails::Running { cadence_spm }),
            WorkoutKind::Cycling => finite(&mut errors, "elevation_gain_m", self.elevation_gain_m)
                .map(|elevation_gain_m| WorkoutDetails::Cycling { elevation_gain_m }),
        };

        // Extreme magnitudes can still overflow the derived metric
        if let (Some(distance_km), Some(duration_min)) = (distance_km, duration_min) {
            let metric = match self.kind {
                WorkoutKind::Running => duration_min / distance_km,
                WorkoutKind::Cycling => distance_km / (duration_min / 60.0),
            };
            if !metric.is_finite() {
                errors.push(FieldError::new("distance_km", "is out of range for duration_min"));
                return Err(errors);
            }
        }

        match (distance_km, duration_min, details) {
            (Some(distance_km), Some(duration_min), Some(details)) => Ok(WorkoutInput {
                distance_km,
                duration_min,
                details,
            }),
            _ => Err(errors),
        }
    }
}

fn finite(errors: &mut Vec<FieldError>, field: &str, value: Option<f64>) -> Option<f64> {
    match value {
        None => {
            errors.push(FieldError::new(field, "is required"));
            None
        }
        Some(v) if !v.is_finite() => {
            errors.push(FieldError::new(field, "must be a finite number"));
            None
        }
        Some(v) => Some(v),
    }
}

fn positive(errors: &mut Vec<FieldError>, field: &str, value: Option<f64>) -> Option<f64> {
    let v = finite(errors, field, value)?;
    if v <= 0.0 {
        errors.push(FieldError::new(field, "must be greater than zero"));
        return None;
    }
    Some(v)
}

fn cadence(errors: &mut Vec<FieldError>, value: Option<f64>) -> Option<u32> {
    let v = positive(errors, "cadence_spm", value)?;
    if v.fract() != 0.0 || v > f64::from(u32::MAX) {
        errors.push(FieldError::new("cadence_spm", "must be a whole number"));
        return None;
    }
    Some(v as u32)
}

/// Accept a number, a numeric string, an empty string or null.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                Some(text.parse().unwrap_or(f64::NAN))
            }
        }
    })
}
