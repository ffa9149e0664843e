//! Relationship management between person records
//!
//! Owns the rules for establishing and severing the five edge types
//! (parent/child, mother, father, spouse, former spouse) and guarantees the
//! spouse-symmetry invariant after every successful mutation.

mod manager;
mod types;

pub use manager::RelationshipManager;
pub(crate) use manager::retry_on_conflict;
pub use types::{RelationTarget, Role};
