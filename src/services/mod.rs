// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod codec;
pub mod geolocation;
pub mod metrics;
pub mod render;
pub mod session;
pub mod session_store;

pub use geolocation::{FixedPosition, GeolocationError, GeolocationProvider};
pub use render::{CommandBuffer, RenderCommand, Renderer};
pub use session::{FormState, MapState, SessionConfig, SessionManager};
pub use session_store::SessionStore;
