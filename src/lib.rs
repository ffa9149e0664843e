//! # Kintree
//!
//! Relationship-management core for a family tree service. Kintree keeps a
//! graph of people joined by identifier-based edges (parent, mother, father,
//! spouse) behind a record-oriented API: person CRUD plus relationship
//! mutations that stay bidirectionally consistent where the edge demands it.
//!
//! ## Quick Start
//!
//! ```rust
//! use kintree::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let manager = kintree::init_with_defaults().await?;
//!
//!     let john = manager
//!         .create_person(PersonRecord::new("John", "Doe"))
//!         .await?;
//!     let john_id = john.id.clone().unwrap();
//!
//!     // Marry John to a newly created Jane. Both records end up pointing
//!     // at each other in a single atomic write.
//!     let married = manager
//!         .set_spouse(&john_id, RelationTarget::New(PersonRecord::new("Jane", "Doe")))
//!         .await?;
//!     assert!(married.spouse_id.is_some());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Storage**: `PersonStore` trait over a durable keyed collection of
//!   person records, with an in-memory reference backend.
//! - **Relationships**: the rules for establishing and severing edges,
//!   including the atomic two-sided spouse write.
//! - **Assembly**: mapping between the flat wire record (bare relationship
//!   identifiers) and the internal person model, with lenient inbound
//!   resolution.
//!
//! An HTTP routing layer is deliberately out of scope; [`errors::ErrorResponse`]
//! is the reference contract such a layer would emit.

pub mod assembly;
pub mod config;
pub mod core;
pub mod errors;
pub mod logging;
pub mod models;
pub mod relationships;
pub mod storage;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::assembly::{PersonAssembler, PersonRecord};
    pub use crate::config::{ConfigBuilder, FamilyTreeConfig, LogFormat, LogLevel};
    pub use crate::core::PersonManager;
    pub use crate::errors::ErrorResponse;
    pub use crate::models::{Person, PersonBuilder};
    pub use crate::relationships::{RelationTarget, RelationshipManager, Role};
    pub use crate::storage::{PersonFilter, PersonStore, StorageError};

    pub use crate::{init, init_with_defaults};

    pub use crate::{FamilyTreeError, Result};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error taxonomy for kintree operations.
///
/// The taxonomy is closed: every failure a caller can observe maps to one of
/// these four kinds, each with a stable string code for programmatic clients
/// (see [`FamilyTreeError::error_code`]).
#[derive(Debug, thiserror::Error)]
pub enum FamilyTreeError {
    /// A referenced identifier did not resolve to an existing person. Carries
    /// the identifier and the relationship role that was being resolved.
    #[error("{role} not found with id: {id}")]
    PersonNotFound {
        /// The identifier that failed to resolve
        id: String,
        /// The role searched for (person, parent, mother, spouse, ...)
        role: crate::relationships::Role,
    },

    /// Malformed or missing required input, e.g. an update without an
    /// identifier.
    #[error("{0}")]
    InvalidArgument(String),

    /// Structural validation of input fields failed.
    #[error("Validation failed")]
    ValidationFailed {
        /// Per-field failure messages, keyed by wire field name
        fields: std::collections::HashMap<String, String>,
    },

    /// Catch-all for failures outside the domain taxonomy. Reported
    /// generically, without leaking internal detail to clients.
    #[error("An unexpected error occurred")]
    Unexpected(String),
}

impl FamilyTreeError {
    /// Stable error code consumed by programmatic clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PersonNotFound { .. } => "PERSON_NOT_FOUND",
            Self::InvalidArgument(_) => "ILLEGAL_ARGUMENT",
            Self::ValidationFailed { .. } => "VALIDATION_ERROR",
            Self::Unexpected(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Reference HTTP status for the excluded routing layer.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::PersonNotFound { .. } => 404,
            Self::InvalidArgument(_) | Self::ValidationFailed { .. } => 400,
            Self::Unexpected(_) => 500,
        }
    }
}

impl From<storage::StorageError> for FamilyTreeError {
    fn from(err: storage::StorageError) -> Self {
        FamilyTreeError::Unexpected(err.to_string())
    }
}

impl From<config::ConfigError> for FamilyTreeError {
    fn from(err: config::ConfigError) -> Self {
        FamilyTreeError::Unexpected(err.to_string())
    }
}

/// Result type for kintree operations
pub type Result<T> = std::result::Result<T, FamilyTreeError>;

/// Initialize kintree with default configuration.
///
/// Sets up logging and an in-memory person store, and returns a
/// [`core::PersonManager`] for interacting with the system.
pub async fn init_with_defaults() -> Result<core::PersonManager> {
    let config = config::ConfigBuilder::new().build()?;
    init(config).await
}

/// Initialize kintree with the provided configuration.
///
/// # Arguments
/// * `config` - The configuration to initialize with
///
/// # Returns
/// A [`core::PersonManager`] instance if initialization succeeds
pub async fn init(config: config::FamilyTreeConfig) -> Result<core::PersonManager> {
    // Ignore errors if tracing is already initialized
    let _ = logging::init(&config.logging);

    let store = storage::create_person_store(&config.storage);

    Ok(core::PersonManager::new(store, config))
}
