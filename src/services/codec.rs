// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted form of a workout session.
//!
//! Encoding writes a versioned envelope in which every entry carries an
//! explicit `kind` tag and only raw fields:
//!
//! ```json
//! {"version":1,"workouts":[{"id":"…","created_at":"…","location":{"lat":39.0,"lng":-12.0},
//!   "distance_km":5.2,"duration_min":24.0,"kind":"running","cadence_spm":178.0}]}
//! ```
//!
//! Decoding dispatches on `kind`, re-validates the raw fields and rebuilds
//! each [`Workout`] through its constructor, so pace, speed and description
//! are always recomputed. The unversioned array written by the first
//! browser app (`type`, `coords`, `distance`, …) is also accepted. Decoding
//! never fails: unreadable documents yield an empty session and unreadable
//! entries are skipped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FieldError;
use crate::models::{Location, Workout, WorkoutDetails, WorkoutForm, WorkoutKind};

/// Current envelope version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    version: u32,
    workouts: Vec<StoredWorkout<'a>>,
}

#[derive(Deserialize)]
struct EnvelopeIn {
    version: u32,
    #[serde(default)]
    workouts: Vec<Value>,
}

#[derive(Serialize)]
struct StoredWorkout<'a> {
    id: &'a str,
    created_at: DateTime<Utc>,
    location: Location,
    distance_km: f64,
    duration_min: f64,
    #[serde(flatten)]
    details: StoredDetails,
}

#[derive(Deserialize)]
struct StoredWorkoutIn {
    id: String,
    created_at: DateTime<Utc>,
    location: Location,
    distance_km: f64,
    duration_min: f64,
    #[serde(flatten)]
    details: StoredDetails,
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum StoredDetails {
    Running { cadence_spm: f64 },
    Cycling { elevation_gain_m: f64 },
}

/// Entry shape of the unversioned browser format. Stored `pace`/`speed`
/// strings are ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyWorkout {
    id: String,
    date: DateTime<Utc>,
    coords: [f64; 2],
    distance: f64,
    duration: f64,
    #[serde(rename = "type")]
    kind: WorkoutKind,
    cadence: Option<f64>,
    elevation_gain: Option<f64>,
}

/// Why a single persisted entry was skipped.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed entry: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid entry: {0:?}")]
    Invalid(Vec<FieldError>),
}

/// Encode workouts in order.
pub fn encode<'a, I>(workouts: I) -> Result<String, serde_json::Error>
where
    I: IntoIterator<Item = &'a Workout>,
{
    let envelope = EnvelopeOut {
        version: FORMAT_VERSION,
        workouts: workouts.into_iter().map(stored).collect(),
    };
    serde_json::to_string(&envelope)
}

fn stored(workout: &Workout) -> StoredWorkout<'_> {
    let details = match workout.details() {
        WorkoutDetails::Running { cadence_spm } => StoredDetails::Running {
            cadence_spm: f64::from(cadence_spm),
        },
        WorkoutDetails::Cycling { elevation_gain_m } => {
            StoredDetails::Cycling { elevation_gain_m }
        }
    };

    StoredWorkout {
        id: workout.id(),
        created_at: workout.created_at(),
        location: workout.location(),
        distance_km: workout.distance_km(),
        duration_min: workout.duration_min(),
        details,
    }
}

/// Decode persisted text. Absent, empty or corrupt input yields an empty list.
pub fn decode(text: &str) -> Vec<Workout> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let document: Value = match serde_json::from_str(text) {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!(error = %e, "Persisted session is not valid JSON, starting empty");
            return Vec::new();
        }
    };

    match document {
        Value::Array(entries) => {
            tracing::info!(count = entries.len(), "Decoding legacy session format");
            decode_entries(entries, decode_legacy)
        }
        Value::Object(_) => match serde_json::from_value::<EnvelopeIn>(document) {
            Ok(envelope) if envelope.version == FORMAT_VERSION => {
                decode_entries(envelope.workouts, decode_current)
            }
            Ok(envelope) => {
                tracing::warn!(
                    version = envelope.version,
                    "Unsupported session format version, starting empty"
                );
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Persisted session envelope is malformed, starting empty");
                Vec::new()
            }
        },
        _ => {
            tracing::warn!("Persisted session has unexpected shape, starting empty");
            Vec::new()
        }
    }
}

fn decode_entries<F>(entries: Vec<Value>, decode_one: F) -> Vec<Workout>
where
    F: Fn(Value) -> Result<Workout, DecodeError>,
{
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match decode_one(entry) {
            Ok(workout) => Some(workout),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping persisted workout");
                None
            }
        })
        .collect()
}

fn decode_current(entry: Value) -> Result<Workout, DecodeError> {
    let stored: StoredWorkoutIn = serde_json::from_value(entry)?;
    let form = match stored.details {
        StoredDetails::Running { cadence_spm } => {
            WorkoutForm::running(stored.distance_km, stored.duration_min, cadence_spm)
        }
        StoredDetails::Cycling { elevation_gain_m } => {
            WorkoutForm::cycling(stored.distance_km, stored.duration_min, elevation_gain_m)
        }
    };
    rehydrate(stored.id, stored.created_at, stored.location, form)
}

fn decode_legacy(entry: Value) -> Result<Workout, DecodeError> {
    let legacy: LegacyWorkout = serde_json::from_value(entry)?;
    let form = WorkoutForm {
        kind: legacy.kind,
        distance_km: Some(legacy.distance),
        duration_min: Some(legacy.duration),
        cadence_spm: legacy.cadence,
        elevation_gain_m: legacy.elevation_gain,
    };
    rehydrate(legacy.id, legacy.date, Location::from(legacy.coords), form)
}

/// Rebuild a workout through the same validation as a fresh submission.
fn rehydrate(
    id: String,
    created_at: DateTime<Utc>,
    location: Location,
    form: WorkoutForm,
) -> Result<Workout, DecodeError> {
    if id.trim().is_empty() {
        return Err(DecodeError::Invalid(vec![FieldError::new(
            "id",
            "must not be empty",
        )]));
    }
    location.validate().map_err(DecodeError::Invalid)?;
    let input = form.validate().map_err(DecodeError::Invalid)?;
    Ok(Workout::new(id, created_at, location, input))
}
