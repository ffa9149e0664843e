//! Types shared by relationship operations

use std::fmt;

use crate::assembly::PersonRecord;

/// The relationship role an identifier was being resolved for.
///
/// Carried by `PersonNotFound` errors so callers can tell which side of an
/// operation failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The subject of an operation
    Person,
    /// The parent side of an add-child operation
    Parent,
    /// The child side of an add-child operation
    Child,
    /// A mother reference
    Mother,
    /// A father reference
    Father,
    /// A spouse reference
    Spouse,
    /// A former spouse reference
    FormerSpouse,
}

impl Role {
    /// Stable lowercase name used in error messages and codes
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Person => "person",
            Role::Parent => "parent",
            Role::Child => "child",
            Role::Mother => "mother",
            Role::Father => "father",
            Role::Spouse => "spouse",
            Role::FormerSpouse => "former spouse",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target of a relationship operation: either inline data for a person to be
/// created, or the identifier of an existing person to link.
#[derive(Debug, Clone)]
pub enum RelationTarget {
    /// Create a new person from inline data
    New(PersonRecord),
    /// Link an existing person by identifier
    Existing(String),
}

impl From<PersonRecord> for RelationTarget {
    fn from(record: PersonRecord) -> Self {
        RelationTarget::New(record)
    }
}

impl From<&str> for RelationTarget {
    fn from(id: &str) -> Self {
        RelationTarget::Existing(id.to_string())
    }
}

impl From<String> for RelationTarget {
    fn from(id: String) -> Self {
        RelationTarget::Existing(id)
    }
}
