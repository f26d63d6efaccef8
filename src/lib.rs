// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mapty-Tracker: log running and cycling sessions on a map
//!
//! This crate provides the workout data model, the session lifecycle
//! (create, validate, store, persist, rehydrate, re-select) and a small
//! JSON API that a map front end drives.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::KeyValueStore;
use services::{CommandBuffer, SessionManager};
use tokio::sync::Mutex;

/// Session manager as hosted by the HTTP server.
pub type SharedSession = SessionManager<Box<dyn KeyValueStore>, CommandBuffer>;

/// Shared application state.
///
/// The session sits behind a single async mutex so that map clicks, form
/// submits and list clicks are handled one at a time.
pub struct AppState {
    pub config: Config,
    pub session: Mutex<SharedSession>,
}
