//! Person Manager interface for kintree
//!
//! The primary facade over the person store, assembler and relationship
//! manager. Callers hand in wire records and identifiers and get wire
//! records back; internal persons never cross this boundary.

use std::sync::Arc;

use tracing::info;

use crate::assembly::{PersonAssembler, PersonRecord};
use crate::config::FamilyTreeConfig;
use crate::relationships::{retry_on_conflict, RelationTarget, RelationshipManager, Role};
use crate::storage::{filters::helpers, PersonFilter, PersonStore};
use crate::{FamilyTreeError, Result};

/// The primary interface for interacting with the family tree.
#[derive(Debug, Clone)]
pub struct PersonManager {
    /// Person record storage
    store: Arc<dyn PersonStore>,

    /// Wire ↔ internal mapping
    assembler: PersonAssembler,

    /// Relationship edge operations
    relationships: RelationshipManager,

    /// Configuration the manager was initialized with
    config: FamilyTreeConfig,
}

impl PersonManager {
    /// Create a new person manager over the given store and configuration
    pub fn new(store: Arc<dyn PersonStore>, config: FamilyTreeConfig) -> Self {
        let assembler = PersonAssembler::new(Arc::clone(&store));
        let relationships = RelationshipManager::new(Arc::clone(&store));

        info!("🌳 PersonManager initialized");
        Self {
            store,
            assembler,
            relationships,
            config,
        }
    }

    /// Access the underlying store
    pub fn store(&self) -> &Arc<dyn PersonStore> {
        &self.store
    }

    /// Access the relationship manager directly
    pub fn relationships(&self) -> &RelationshipManager {
        &self.relationships
    }

    /// The configuration this manager was initialized with
    pub fn config(&self) -> &FamilyTreeConfig {
        &self.config
    }

    // =========================================================================
    // Person CRUD
    // =========================================================================

    /// Create a new person from a wire record.
    ///
    /// The identifier is assigned by the store; any identifier supplied in
    /// the record is ignored. Relationship identifiers are resolved
    /// leniently (unresolvable ones are dropped).
    pub async fn create_person(&self, record: PersonRecord) -> Result<PersonRecord> {
        record.validate()?;
        let mut record = record;
        record.id = None;

        let person = self.assembler.to_person(&record).await?;
        let created = self.store.create_person(person).await?;
        info!(person_id = %created.id, "created person");
        Ok(self.assembler.to_record(&created))
    }

    /// Update an existing person's attributes.
    ///
    /// Fails with `InvalidArgument` when the record carries no identifier and
    /// `PersonNotFound` when the identifier is unknown; neither case writes.
    /// The stored parent edge is preserved, since the wire record cannot
    /// express it.
    pub async fn update_person(&self, record: PersonRecord) -> Result<PersonRecord> {
        let Some(id) = record.id.clone() else {
            return Err(FamilyTreeError::InvalidArgument(
                "person id is required for update".to_string(),
            ));
        };
        record.validate()?;

        let template = self.assembler.to_person(&record).await?;
        let mut attempts = 0;
        let updated = loop {
            let existing = self.relationships.resolve(&id, Role::Person).await?;

            let mut person = template.clone();
            person.parent_id = existing.parent_id;
            person.version = existing.version;

            match self.store.update_person(person).await {
                Ok(updated) => break updated,
                Err(e) => retry_on_conflict(e, &mut attempts)?,
            }
        };
        info!(person_id = %updated.id, "updated person");
        Ok(self.assembler.to_record(&updated))
    }

    /// Get a person by identifier
    pub async fn get_person(&self, id: &str) -> Result<PersonRecord> {
        let person = self.relationships.resolve(id, Role::Person).await?;
        Ok(self.assembler.to_record(&person))
    }

    /// Delete a person by identifier.
    ///
    /// Deletion does not cascade: references other records hold to the
    /// deleted person are left dangling.
    pub async fn delete_person(&self, id: &str) -> Result<()> {
        self.relationships.resolve(id, Role::Person).await?;
        self.store.delete_person(id).await?;
        info!(person_id = %id, "deleted person");
        Ok(())
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Find all persons with the given first name
    pub async fn find_by_first_name(&self, first_name: &str) -> Result<Vec<PersonRecord>> {
        self.find_persons(helpers::by_first_name(first_name), None, None)
            .await
    }

    /// Find all persons with the given last name
    pub async fn find_by_last_name(&self, last_name: &str) -> Result<Vec<PersonRecord>> {
        self.find_persons(helpers::by_last_name(last_name), None, None)
            .await
    }

    /// Find persons matching a filter
    pub async fn find_persons(
        &self,
        filter: PersonFilter,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<PersonRecord>> {
        let persons = self.store.list_persons(Some(filter), limit, offset).await?;
        Ok(persons.iter().map(|p| self.assembler.to_record(p)).collect())
    }

    /// Count persons matching a filter
    pub async fn count_persons(&self, filter: Option<PersonFilter>) -> Result<usize> {
        Ok(self.store.count_persons(filter).await?)
    }

    /// Derived children view of a person
    pub async fn children_of(&self, parent_id: &str) -> Result<Vec<PersonRecord>> {
        let children = self.relationships.children_of(parent_id).await?;
        Ok(children.iter().map(|p| self.assembler.to_record(p)).collect())
    }

    // =========================================================================
    // Relationship operations (delegated to RelationshipManager)
    // =========================================================================

    /// Add a child under a parent; returns the (possibly created) child
    pub async fn add_child(
        &self,
        parent_id: &str,
        target: impl Into<RelationTarget>,
    ) -> Result<PersonRecord> {
        let child = self.relationships.add_child(parent_id, target.into()).await?;
        Ok(self.assembler.to_record(&child))
    }

    /// Set a person's mother; returns the updated subject
    pub async fn set_mother(
        &self,
        person_id: &str,
        target: impl Into<RelationTarget>,
    ) -> Result<PersonRecord> {
        let subject = self.relationships.set_mother(person_id, target.into()).await?;
        Ok(self.assembler.to_record(&subject))
    }

    /// Set a person's father; returns the updated subject
    pub async fn set_father(
        &self,
        person_id: &str,
        target: impl Into<RelationTarget>,
    ) -> Result<PersonRecord> {
        let subject = self.relationships.set_father(person_id, target.into()).await?;
        Ok(self.assembler.to_record(&subject))
    }

    /// Marry two persons; returns the updated subject
    pub async fn set_spouse(
        &self,
        person_id: &str,
        target: impl Into<RelationTarget>,
    ) -> Result<PersonRecord> {
        let subject = self.relationships.set_spouse(person_id, target.into()).await?;
        Ok(self.assembler.to_record(&subject))
    }

    /// Dissolve a person's marriage; a no-op when unmarried
    pub async fn delete_spouse(&self, person_id: &str) -> Result<()> {
        self.relationships.delete_spouse(person_id).await
    }

    /// Record a former spouse; returns that person. No edge is persisted.
    pub async fn add_former_spouse(
        &self,
        person_id: &str,
        target: impl Into<RelationTarget>,
    ) -> Result<PersonRecord> {
        let former = self
            .relationships
            .add_former_spouse(person_id, target.into())
            .await?;
        Ok(self.assembler.to_record(&former))
    }
}
