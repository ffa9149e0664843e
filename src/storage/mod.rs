//! Storage layer for kintree
//!
//! Defines the person store contract and the in-memory reference backend.
//! The store is deliberately thin: durable keyed records, point lookups,
//! simple attribute filtering, and one atomic multi-record write primitive.
//! Writes are optimistic: each record carries the version it was read at,
//! and a stale write fails with [`StorageError::Conflict`].

pub mod errors;
pub mod filters;
pub mod memory;
pub mod traits;

use std::sync::Arc;

pub use errors::{StorageError, StorageResult};
pub use filters::PersonFilter;
pub use memory::InMemoryPersonStore;
pub use traits::{BaseStore, PersonStore};

use crate::config::{StorageBackend, StorageConfig};

/// Create a person store from the given storage configuration.
pub fn create_person_store(config: &StorageConfig) -> Arc<dyn PersonStore> {
    match config.backend {
        StorageBackend::Memory => Arc::new(InMemoryPersonStore::new()),
    }
}
