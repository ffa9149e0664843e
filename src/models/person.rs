//! Person model representing one family member
//!
//! Relationship fields are stored as bare identifiers into the person store,
//! never as owned references to other `Person` values. Two records related to
//! each other are joined by id only; consistency between them is the
//! relationship manager's job.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person record in the family tree.
///
/// The `children` collection is deliberately absent: it is a derived view,
/// computed as the set of persons whose `parent_id` equals this person's id
/// (see `PersonStore::find_children`). Storing it here would create a second
/// source of truth for the same edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    /// Unique identifier, assigned on creation and immutable thereafter
    pub id: String,

    /// First name (required)
    pub first_name: String,

    /// Middle name (optional)
    pub middle_name: Option<String>,

    /// Last name (required)
    pub last_name: String,

    /// Occupation
    pub occupation: Option<String>,

    /// Detailed life story or biography
    pub life_story: Option<String>,

    /// Birth date
    pub born_date: Option<NaiveDate>,

    /// Death date (`None` means living)
    pub died_date: Option<NaiveDate>,

    /// Birth place
    pub birth_place: Option<String>,

    /// Current address
    pub current_address: Option<String>,

    /// Generic parent link; the inverse (children) is derived by query
    pub parent_id: Option<String>,

    /// Mother reference; no back-reference is kept on the mother's side
    pub mother_id: Option<String>,

    /// Father reference; no back-reference is kept on the father's side
    pub father_id: Option<String>,

    /// Spouse reference; symmetric. If set, the referenced person's
    /// `spouse_id` points back here
    pub spouse_id: Option<String>,

    /// Write version, bumped by the store on every successful update. An
    /// update carrying a stale version is rejected, so two read-modify-write
    /// sequences racing on the same record cannot silently overwrite each
    /// other. Never exposed on the wire.
    #[serde(default)]
    pub version: u64,
}

impl Person {
    /// Create a new person with the required fields and a given identifier.
    pub fn new<S: Into<String>>(id: S, first_name: S, last_name: S) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            middle_name: None,
            last_name: last_name.into(),
            occupation: None,
            life_story: None,
            born_date: None,
            died_date: None,
            birth_place: None,
            current_address: None,
            parent_id: None,
            mother_id: None,
            father_id: None,
            spouse_id: None,
            version: 0,
        }
    }

    /// Create a builder with an auto-generated identifier.
    ///
    /// This is the recommended way to create new persons.
    pub fn builder<S: Into<String>>(first_name: S, last_name: S) -> PersonBuilder {
        PersonBuilder::new(first_name, last_name)
    }

    /// Whether this person is living (no recorded death date).
    pub fn is_living(&self) -> bool {
        self.died_date.is_none()
    }

    /// Full display name: first, optional middle, last.
    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(middle) => format!("{} {} {}", self.first_name, middle, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

/// Builder for creating `Person` instances
pub struct PersonBuilder {
    person: Person,
}

impl PersonBuilder {
    /// Create a new person builder with an auto-generated UUID.
    pub fn new<S: Into<String>>(first_name: S, last_name: S) -> Self {
        Self {
            person: Person::new(
                Uuid::new_v4().to_string(),
                first_name.into(),
                last_name.into(),
            ),
        }
    }

    /// Set the middle name
    pub fn middle_name<S: Into<String>>(mut self, middle_name: S) -> Self {
        self.person.middle_name = Some(middle_name.into());
        self
    }

    /// Set the occupation
    pub fn occupation<S: Into<String>>(mut self, occupation: S) -> Self {
        self.person.occupation = Some(occupation.into());
        self
    }

    /// Set the life story
    pub fn life_story<S: Into<String>>(mut self, life_story: S) -> Self {
        self.person.life_story = Some(life_story.into());
        self
    }

    /// Set the birth date
    pub fn born_date(mut self, born_date: NaiveDate) -> Self {
        self.person.born_date = Some(born_date);
        self
    }

    /// Set the death date
    pub fn died_date(mut self, died_date: NaiveDate) -> Self {
        self.person.died_date = Some(died_date);
        self
    }

    /// Set the birth place
    pub fn birth_place<S: Into<String>>(mut self, birth_place: S) -> Self {
        self.person.birth_place = Some(birth_place.into());
        self
    }

    /// Set the current address
    pub fn current_address<S: Into<String>>(mut self, current_address: S) -> Self {
        self.person.current_address = Some(current_address.into());
        self
    }

    /// Build the final `Person` instance
    pub fn build(self) -> Person {
        self.person
    }
}
