// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mapty-Tracker API Server
//!
//! Hosts the workout session behind a JSON API for the map front end.

use mapty_tracker::{
    config::Config,
    db::{FileStore, KeyValueStore},
    services::{geolocation, CommandBuffer, FixedPosition, SessionConfig, SessionManager},
    AppState,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Mapty-Tracker API");

    // Rehydrate the persisted session
    let file_store = FileStore::new(&config.data_dir);
    tracing::info!(dir = %file_store.dir().display(), key = %config.storage_key, "Using file store");
    let kv: Box<dyn KeyValueStore> = Box::new(file_store);
    let session = SessionManager::new(kv, CommandBuffer::new(), SessionConfig::from(&config));

    let state = Arc::new(AppState {
        config: config.clone(),
        session: Mutex::new(session),
    });

    // Resolve the position in the background; map clicks are refused until then
    let provider = FixedPosition::new(config.home_position);
    let timeout = config.geolocation_timeout;
    let geo_state = state.clone();
    tokio::spawn(async move {
        let outcome = geolocation::locate(&provider, timeout).await;
        let mut session = geo_state.session.lock().await;
        // Failure is logged and recorded in the map state
        let _ = session.on_position(outcome);
    });

    // Build router
    let app = mapty_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mapty_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
