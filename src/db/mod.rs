// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key-value persistence layer.
//!
//! The session codec stores the whole workout list as one text value under a
//! single key, so a store only needs whole-value `save`, `load` and `clear`.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key names as constants.
pub mod keys {
    /// Default key for the persisted workout list
    pub const WORKOUTS: &str = "workouts";
}

/// Synchronous text key-value store.
///
/// Writes complete before the call returns, giving read-your-writes within a
/// process.
pub trait KeyValueStore: Send + Sync {
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// `Ok(None)` when nothing is stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Clearing an absent key is not an error.
    fn clear(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).save(key, value)
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        (**self).clear(key)
    }
}

/// Errors from key-value store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}
