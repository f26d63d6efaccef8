// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout session lifecycle.
//!
//! Handles the core workflow:
//! 1. Rehydrate persisted workouts at startup
//! 2. Centre the map once the position is known
//! 3. Hold the clicked location while the form is open
//! 4. Validate the form, build the workout and append it
//! 5. Persist the whole session and tell the renderer
//!
//! Each call runs to completion before the next one; validating and
//! committing happen inside [`SessionManager::submit`] and are never
//! observable as states of their own.

use chrono::Utc;
use std::time::Duration;

use crate::config::Config;
use crate::db::KeyValueStore;
use crate::error::{AppError, Result};
use crate::models::{Location, Workout, WorkoutForm, WorkoutInput};
use crate::services::codec;
use crate::services::geolocation::{self, GeolocationError, GeolocationProvider};
use crate::services::render::Renderer;
use crate::services::session_store::SessionStore;

/// Alert shown when a submitted form is rejected.
pub const INVALID_INPUT_ALERT: &str = "Inputs have to be positive numbers!";
/// Alert shown when the position cannot be determined.
pub const GEOLOCATION_ALERT: &str = "Could not get your position";

/// How many fresh ids to try when an id is already taken.
const MAX_ID_ATTEMPTS: usize = 3;

/// Settings the session manager needs from [`Config`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub storage_key: String,
    pub map_zoom: u8,
    pub geolocation_timeout: Duration,
}

impl From<&Config> for SessionConfig {
    fn from(config: &Config) -> Self {
        Self {
            storage_key: config.storage_key.clone(),
            map_zoom: config.map_zoom,
            geolocation_timeout: config.geolocation_timeout,
        }
    }
}

/// Map availability.
#[derive(Debug, Clone, PartialEq)]
pub enum MapState {
    /// Waiting for the geolocation provider
    Pending,
    Ready { center: Location, zoom: u8 },
    /// Geolocation failed; map-dependent operations are unavailable
    Unavailable { reason: String },
}

/// Workout form flow.
#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Idle,
    /// The map was clicked and the form is open. `draft` holds the fields of
    /// the last rejected submission.
    AwaitingInput {
        pending: Location,
        draft: Option<WorkoutForm>,
    },
}

type IdGenerator = Box<dyn FnMut() -> String + Send>;

fn uuid_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Owns the session: the workout store, its persistence and the form flow.
pub struct SessionManager<S, R> {
    kv: S,
    renderer: R,
    config: SessionConfig,
    store: SessionStore,
    map: MapState,
    form: FormState,
    next_id: IdGenerator,
}

impl<S: KeyValueStore, R: Renderer> SessionManager<S, R> {
    /// Create a manager, rehydrating any persisted session.
    ///
    /// A load failure is treated like an empty session. Every rehydrated
    /// workout is listed right away; markers wait for the map.
    pub fn new(kv: S, renderer: R, config: SessionConfig) -> Self {
        let workouts = match kv.load(&config.storage_key) {
            Ok(Some(text)) => codec::decode(&text),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, key = %config.storage_key, "Failed to load session, starting empty");
                Vec::new()
            }
        };
        let store = SessionStore::from_workouts(workouts);
        tracing::info!(count = store.len(), "Session rehydrated");

        let mut manager = Self {
            kv,
            renderer,
            config,
            store,
            map: MapState::Pending,
            form: FormState::Idle,
            next_id: Box::new(uuid_id),
        };
        for workout in manager.store.all() {
            manager.renderer.show_list_entry(workout);
        }
        manager
    }

    /// Replace the id generator (UUID v4 by default).
    pub fn with_id_generator<F>(mut self, generator: F) -> Self
    where
        F: FnMut() -> String + Send + 'static,
    {
        self.next_id = Box::new(generator);
        self
    }

    // ─── Map ─────────────────────────────────────────────────────

    /// Ask the provider for a position and initialise the map with it.
    pub async fn init_map<G: GeolocationProvider>(&mut self, provider: &G) -> Result<Location> {
        let outcome = geolocation::locate(provider, self.config.geolocation_timeout).await;
        self.on_position(outcome)
    }

    /// Apply the outcome of a position request.
    ///
    /// On success the map becomes ready and every stored workout gets a
    /// marker. On failure the map stays unavailable for the rest of the run,
    /// even if a position arrives later.
    pub fn on_position(
        &mut self,
        outcome: std::result::Result<Location, GeolocationError>,
    ) -> Result<Location> {
        match &self.map {
            MapState::Ready { center, .. } => return Ok(*center),
            MapState::Unavailable { reason } => {
                return Err(AppError::MapUnavailable(reason.clone()))
            }
            MapState::Pending => {}
        }

        match outcome {
            Ok(center) => {
                let zoom = self.config.map_zoom;
                self.map = MapState::Ready { center, zoom };
                self.renderer.set_view(center, zoom);
                for workout in self.store.all() {
                    self.renderer.show_marker(workout);
                }
                tracing::info!(lat = center.lat, lng = center.lng, zoom, "Map ready");
                Ok(center)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Geolocation failed, map unavailable");
                self.map = MapState::Unavailable {
                    reason: e.to_string(),
                };
                self.renderer.alert(GEOLOCATION_ALERT);
                Err(e.into())
            }
        }
    }

    /// Zoom of the ready map, or why the map cannot be used.
    fn require_map(&self) -> Result<u8> {
        match &self.map {
            MapState::Ready { zoom, .. } => Ok(*zoom),
            MapState::Pending => Err(AppError::MapUnavailable(
                "map is still loading".to_string(),
            )),
            MapState::Unavailable { reason } => Err(AppError::MapUnavailable(reason.clone())),
        }
    }

    /// A click on the map opens the form for that location. A second click
    /// moves the pending location. Clicks on a wrapped copy of the world are
    /// brought back into [-180, 180].
    pub fn map_click(&mut self, location: Location) -> Result<()> {
        self.require_map()?;
        let location = location.wrap_lng();
        location.validate().map_err(AppError::InvalidInput)?;

        self.form = FormState::AwaitingInput {
            pending: location,
            draft: None,
        };
        self.renderer.show_form(location);
        tracing::debug!(lat = location.lat, lng = location.lng, "Awaiting workout input");
        Ok(())
    }

    // ─── Workouts ────────────────────────────────────────────────

    /// Validate and commit a workout at the pending location.
    ///
    /// Either the workout is appended, persisted and rendered, or nothing
    /// changes and the error says why. A rejected form keeps the form open
    /// with its fields retained.
    pub fn submit(&mut self, form: WorkoutForm) -> Result<Workout> {
        let pending = match &self.form {
            FormState::AwaitingInput { pending, .. } => *pending,
            FormState::Idle => return Err(AppError::NoPendingLocation),
        };

        let input = match form.validate() {
            Ok(input) => input,
            Err(fields) => {
                tracing::info!(kind = %form.kind, fields = ?fields, "Rejected workout input");
                self.renderer.alert(INVALID_INPUT_ALERT);
                self.form = FormState::AwaitingInput {
                    pending,
                    draft: Some(form),
                };
                return Err(AppError::InvalidInput(fields));
            }
        };

        let workout = self.commit(pending, input)?;

        self.renderer.show_marker(&workout);
        self.renderer.show_list_entry(&workout);
        self.renderer.hide_form();
        self.form = FormState::Idle;

        tracing::info!(
            workout_id = %workout.id(),
            kind = %workout.kind(),
            metric = workout.metric().value(),
            count = self.store.len(),
            "Workout logged"
        );
        Ok(workout)
    }

    /// Append and persist, rolling the append back if persisting fails.
    fn commit(&mut self, location: Location, input: WorkoutInput) -> Result<Workout> {
        let created_at = Utc::now();
        let mut attempts = 0;

        let workout = loop {
            attempts += 1;
            let workout = Workout::new((self.next_id)(), created_at, location, input);
            match self.store.append(workout.clone()) {
                Ok(()) => break workout,
                Err(AppError::DuplicateId(id)) if attempts < MAX_ID_ATTEMPTS => {
                    tracing::warn!(workout_id = %id, attempts, "Workout id collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        };

        if let Err(e) = self.persist() {
            self.store.pop_last();
            return Err(e);
        }
        Ok(workout)
    }

    /// Re-encode the whole session under the storage key.
    fn persist(&self) -> Result<()> {
        let text = codec::encode(self.store.all())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode session: {}", e)))?;
        self.kv.save(&self.config.storage_key, &text)?;
        Ok(())
    }

    /// Re-centre the map on a listed workout.
    pub fn recenter(&mut self, id: &str) -> Result<Location> {
        let location = self
            .store
            .find_by_id(id)
            .map(Workout::location)
            .ok_or_else(|| AppError::NotFound(format!("Workout {} not found", id)))?;
        let zoom = self.require_map()?;

        self.renderer.recenter_on(location, zoom);
        Ok(location)
    }

    /// Forget every workout, in memory and in storage.
    pub fn reset(&mut self) -> Result<()> {
        self.kv.clear(&self.config.storage_key)?;
        let removed = self.store.len();
        self.store.clear();
        self.form = FormState::Idle;
        tracing::info!(removed, "Session reset");
        Ok(())
    }

    // ─── Accessors ───────────────────────────────────────────────

    /// Workouts in logging order.
    pub fn workouts(&self) -> std::slice::Iter<'_, Workout> {
        self.store.all()
    }

    pub fn find(&self, id: &str) -> Option<&Workout> {
        self.store.find_by_id(id)
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn map_state(&self) -> &MapState {
        &self.map
    }

    pub fn form_state(&self) -> &FormState {
        &self.form
    }

    pub fn pending_location(&self) -> Option<Location> {
        match &self.form {
            FormState::AwaitingInput { pending, .. } => Some(*pending),
            FormState::Idle => None,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
