// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod form;
pub mod location;
pub mod workout;

pub use form::{WorkoutForm, WorkoutInput};
pub use location::Location;
pub use workout::{Metric, Workout, WorkoutDetails, WorkoutKind, WorkoutView};
