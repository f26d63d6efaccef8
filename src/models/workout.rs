// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout model.
//!
//! A workout is a closed tagged variant (running or cycling). All per-kind
//! behavior is a `match` over [`WorkoutDetails`], so the kind survives any
//! serialization and drives reconstruction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{Location, WorkoutInput};
use crate::services::metrics;
use crate::time_utils::format_utc_rfc3339;

/// Workout discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    /// Lowercase name used on the wire and in CSS classes.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "running",
            WorkoutKind::Cycling => "cycling",
        }
    }

    /// Capitalized name used in descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Cycling => "Cycling",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "🏃‍♂️",
            WorkoutKind::Cycling => "🚴‍♀️",
        }
    }

    /// CSS class applied to the marker popup.
    pub fn popup_class(&self) -> String {
        format!("{}-popup", self.as_str())
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific raw inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkoutDetails {
    Running {
        /// Steps per minute
        cadence_spm: u32,
    },
    Cycling {
        /// Metres climbed; zero or negative is allowed
        elevation_gain_m: f64,
    },
}

impl WorkoutDetails {
    pub fn kind(&self) -> WorkoutKind {
        match self {
            WorkoutDetails::Running { .. } => WorkoutKind::Running,
            WorkoutDetails::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// The derived metric of a workout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    /// Minutes per kilometre
    Pace(f64),
    /// Kilometres per hour
    Speed(f64),
}

impl Metric {
    pub fn value(&self) -> f64 {
        match self {
            Metric::Pace(v) | Metric::Speed(v) => *v,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Pace(_) => "min/km",
            Metric::Speed(_) => "km/h",
        }
    }
}

/// One logged exercise session.
///
/// Derived fields are computed once in [`Workout::new`] and there are no
/// setters, so they always agree with the raw inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: String,
    created_at: DateTime<Utc>,
    location: Location,
    distance_km: f64,
    duration_min: f64,
    details: WorkoutDetails,
    description: String,
    metric: Metric,
}

impl Workout {
    /// Build a workout from validated input, deriving description and metric.
    pub fn new(
        id: String,
        created_at: DateTime<Utc>,
        location: Location,
        input: WorkoutInput,
    ) -> Self {
        let WorkoutInput {
            distance_km,
            duration_min,
            details,
        } = input;

        let metric = match details {
            WorkoutDetails::Running { .. } => {
                Metric::Pace(metrics::pace_min_per_km(distance_km, duration_min))
            }
            WorkoutDetails::Cycling { .. } => {
                Metric::Speed(metrics::speed_km_per_hr(distance_km, duration_min))
            }
        };
        let description = metrics::describe(details.kind(), created_at);

        Self {
            id,
            created_at,
            location,
            distance_km,
            duration_min,
            details,
            description,
            metric,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn details(&self) -> WorkoutDetails {
        self.details
    }

    pub fn kind(&self) -> WorkoutKind {
        self.details.kind()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Pace in min/km, running only.
    pub fn pace(&self) -> Option<f64> {
        match self.metric {
            Metric::Pace(pace) => Some(pace),
            Metric::Speed(_) => None,
        }
    }

    /// Speed in km/h, cycling only.
    pub fn speed(&self) -> Option<f64> {
        match self.metric {
            Metric::Speed(speed) => Some(speed),
            Metric::Pace(_) => None,
        }
    }

    /// Marker popup text, e.g. "🏃‍♂️ Running on April 14".
    pub fn popup_content(&self) -> String {
        format!("{} {}", self.kind().icon(), self.description)
    }

    /// Display fields for the workout list.
    pub fn view(&self) -> WorkoutView {
        let (cadence_spm, elevation_gain_m) = match self.details {
            WorkoutDetails::Running { cadence_spm } => (Some(cadence_spm), None),
            WorkoutDetails::Cycling { elevation_gain_m } => (None, Some(elevation_gain_m)),
        };

        WorkoutView {
            id: self.id.clone(),
            kind: self.kind(),
            description: self.description.clone(),
            icon: self.kind().icon().to_string(),
            location: self.location,
            created_at: format_utc_rfc3339(self.created_at),
            distance_km: self.distance_km,
            duration_min: self.duration_min,
            pace_min_per_km: self.pace(),
            speed_km_per_hr: self.speed(),
            cadence_spm,
            elevation_gain_m,
        }
    }
}

/// Workout summary for API responses and list entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutView {
    pub id: String,
    pub kind: WorkoutKind,
    pub description: String,
    pub icon: String,
    pub location: Location,
    pub created_at: String,
    pub distance_km: f64,
    pub duration_min: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pace_min_per_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_km_per_hr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cadence_spm: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_gain_m: Option<f64>,
}
