// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes driven by the map front end.
//!
//! Every handler takes the session lock for its whole run, so events are
//! processed one at a time. Render commands produced while handling an event
//! are returned in the response.

use crate::error::Result;
use crate::models::{Location, WorkoutForm, WorkoutView};
use crate::services::{MapState, RenderCommand};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/map", get(get_map))
        .route("/api/map/click", post(click_map))
        .route(
            "/api/workouts",
            get(list_workouts)
                .post(submit_workout)
                .delete(reset_workouts),
        )
        .route("/api/workouts/{id}/recenter", post(recenter_workout))
        .route("/api/render", get(pending_render))
}

// ─── Map ─────────────────────────────────────────────────────

/// Map status response.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MapResponse {
    /// "pending", "ready" or "unavailable"
    pub status: String,
    pub center: Option<Location>,
    pub zoom: Option<u8>,
    pub reason: Option<String>,
}

impl From<&MapState> for MapResponse {
    fn from(state: &MapState) -> Self {
        match state {
            MapState::Pending => Self {
                status: "pending".to_string(),
                center: None,
                zoom: None,
                reason: None,
            },
            MapState::Ready { center, zoom } => Self {
                status: "ready".to_string(),
                center: Some(*center),
                zoom: Some(*zoom),
                reason: None,
            },
            MapState::Unavailable { reason } => Self {
                status: "unavailable".to_string(),
                center: None,
                zoom: None,
                reason: Some(reason.clone()),
            },
        }
    }
}

/// Get the map status.
async fn get_map(State(state): State<Arc<AppState>>) -> Json<MapResponse> {
    let session = state.session.lock().await;
    Json(MapResponse::from(session.map_state()))
}

/// Response to a map click.
#[derive(Serialize, Deserialize)]
pub struct ClickResponse {
    pub pending: Location,
    pub render: Vec<RenderCommand>,
}

/// Record a map click as the location of the next workout.
async fn click_map(
    State(state): State<Arc<AppState>>,
    Json(location): Json<Location>,
) -> Result<Json<ClickResponse>> {
    let mut session = state.session.lock().await;
    session.map_click(location)?;

    Ok(Json(ClickResponse {
        pending: location,
        render: session.renderer_mut().drain(),
    }))
}

/// Take render commands not yet delivered, such as the markers and list
/// entries drawn when the session was rehydrated.
async fn pending_render(State(state): State<Arc<AppState>>) -> Json<Vec<RenderCommand>> {
    let mut session = state.session.lock().await;
    Json(session.renderer_mut().drain())
}

// ─── Workouts ────────────────────────────────────────────────

/// List all workouts in logging order.
async fn list_workouts(State(state): State<Arc<AppState>>) -> Json<Vec<WorkoutView>> {
    let session = state.session.lock().await;
    Json(session.workouts().map(|w| w.view()).collect())
}

/// Response for a logged workout.
#[derive(Serialize, Deserialize)]
pub struct SubmitResponse {
    pub workout: WorkoutView,
    pub render: Vec<RenderCommand>,
}

/// Submit the workout form for the pending location.
async fn submit_workout(
    State(state): State<Arc<AppState>>,
    Json(form): Json<WorkoutForm>,
) -> Result<(StatusCode, Json<SubmitResponse>)> {
    let mut session = state.session.lock().await;
    let result = session.submit(form);
    // Alerts for rejected input are carried by the error body instead
    let render = session.renderer_mut().drain();
    let workout = result?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            workout: workout.view(),
            render,
        }),
    ))
}

/// Response for a list entry click.
#[derive(Serialize, Deserialize)]
pub struct RecenterResponse {
    pub location: Location,
    pub render: Vec<RenderCommand>,
}

/// Re-centre the map on a workout.
async fn recenter_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RecenterResponse>> {
    let mut session = state.session.lock().await;
    let location = session.recenter(&id)?;

    Ok(Json(RecenterResponse {
        location,
        render: session.renderer_mut().drain(),
    }))
}

/// Delete every workout.
async fn reset_workouts(State(state): State<Arc<AppState>>) -> Result<StatusCode> {
    let mut session = state.session.lock().await;
    session.reset()?;
    session.renderer_mut().discard_workouts();
    Ok(StatusCode::NO_CONTENT)
}
