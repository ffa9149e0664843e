//! Trait definitions for person storage backends

use std::fmt::Debug;

use async_trait::async_trait;

use crate::models::Person;
use crate::storage::errors::StorageError;
use crate::storage::filters::PersonFilter;

/// Base trait for all storage implementations
#[async_trait]
pub trait BaseStore: Send + Sync + 'static + Debug {
    /// Check if the store is healthy and available
    async fn health_check(&self) -> Result<bool, StorageError>;

    /// Clear all data in the store
    async fn clear(&self) -> Result<(), StorageError>;

    /// Get metadata about the store
    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError>;
}

/// Trait for person record operations.
///
/// The store is a thin collaborator: durable keyed records with point
/// lookups and simple attribute filtering. All relationship rules live above
/// it, in the relationship manager.
#[async_trait]
pub trait PersonStore: BaseStore {
    /// Create a new person record
    async fn create_person(&self, person: Person) -> Result<Person, StorageError>;

    /// Get a person by id
    async fn get_person(&self, id: &str) -> Result<Option<Person>, StorageError>;

    /// Update an existing person record.
    ///
    /// The write is optimistic: it fails with `Conflict` when the record's
    /// `version` does not match the stored one, meaning another write landed
    /// since the caller read it. The stored version is bumped on success.
    async fn update_person(&self, person: Person) -> Result<Person, StorageError>;

    /// Update several person records as a single atomic unit.
    ///
    /// Either every record is durably updated or none is; a concurrent reader
    /// never observes a partial write. This is the primitive the spouse edge
    /// relies on for its bidirectional invariant. Each record's `version` is
    /// checked the same way as in `update_person`: one stale record fails the
    /// whole batch with `Conflict` before anything is written.
    async fn update_many(&self, persons: Vec<Person>) -> Result<Vec<Person>, StorageError>;

    /// Delete a person by id, returning whether a record was removed
    async fn delete_person(&self, id: &str) -> Result<bool, StorageError>;

    /// List persons with optional filtering
    async fn list_persons(
        &self,
        filter: Option<PersonFilter>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Person>, StorageError>;

    /// Count persons with optional filtering
    async fn count_persons(&self, filter: Option<PersonFilter>) -> Result<usize, StorageError>;

    /// Derived children view: all persons whose `parent_id` equals `parent_id`
    async fn find_children(&self, parent_id: &str) -> Result<Vec<Person>, StorageError>;
}
