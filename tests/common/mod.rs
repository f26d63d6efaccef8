// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use mapty_tracker::config::Config;
use mapty_tracker::db::{KeyValueStore, MemoryStore, StorageError};
use mapty_tracker::models::Location;
use mapty_tracker::routes::create_router;
use mapty_tracker::services::{CommandBuffer, SessionConfig, SessionManager};
use mapty_tracker::AppState;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Position the test map is centred on.
#[allow(dead_code)]
pub const HOME: Location = Location {
    lat: 39.0,
    lng: -12.0,
};

/// Ids "w1", "w2", … in order.
#[allow(dead_code)]
pub fn sequential_ids() -> impl FnMut() -> String + Send + 'static {
    let mut next = 0;
    move || {
        next += 1;
        format!("w{}", next)
    }
}

/// Session manager over a shared in-memory store, with the map not yet ready.
#[allow(dead_code)]
pub fn test_session(store: &MemoryStore) -> SessionManager<MemoryStore, CommandBuffer> {
    SessionManager::new(
        store.clone(),
        CommandBuffer::new(),
        SessionConfig::from(&Config::test_default()),
    )
    .with_id_generator(sequential_ids())
}

/// Session manager whose map is centred on [`HOME`], render buffer drained.
#[allow(dead_code)]
pub fn ready_session(store: &MemoryStore) -> SessionManager<MemoryStore, CommandBuffer> {
    let mut session = test_session(store);
    session.on_position(Ok(HOME)).expect("map should initialise");
    session.renderer_mut().drain();
    session
}

/// Store whose writes always fail.
#[allow(dead_code)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn save(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io {
            key: key.to_string(),
            source: std::io::Error::other("disk full"),
        })
    }

    fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        Err(StorageError::Io {
            key: key.to_string(),
            source: std::io::Error::other("read-only"),
        })
    }
}

/// Create a test app backed by an in-memory store.
/// Returns the router, the shared state and a handle on the store.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, MemoryStore) {
    let store = MemoryStore::new();
    let (app, state) = create_test_app_with_store(&store, true);
    (app, state, store)
}

/// Create a test app over `store`, optionally with the map already ready.
#[allow(dead_code)]
pub fn create_test_app_with_store(
    store: &MemoryStore,
    map_ready: bool,
) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let kv: Box<dyn KeyValueStore> = Box::new(store.clone());
    let mut session = SessionManager::new(kv, CommandBuffer::new(), SessionConfig::from(&config))
        .with_id_generator(sequential_ids());
    if map_ready {
        session.on_position(Ok(HOME)).expect("map should initialise");
    }

    let state = Arc::new(AppState {
        config,
        session: Mutex::new(session),
    });

    (create_router(state.clone()), state)
}
