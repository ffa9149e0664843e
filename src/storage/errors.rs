//! Error types for storage operations

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Operation error
    #[error("Operation error: {0}")]
    Operation(String),

    /// Query error
    #[error("Query error: {0}")]
    Query(String),

    /// A multi-record write could not be applied as a unit
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// A write carried a stale record version; the caller should re-read
    /// and retry
    #[error("Version conflict: {0}")]
    Conflict(String),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Record already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
