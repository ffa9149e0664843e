//! Relationship manager: edge mutations over the person store

use std::sync::Arc;

use tracing::{debug, info};

use crate::assembly::PersonAssembler;
use crate::models::Person;
use crate::relationships::{RelationTarget, Role};
use crate::storage::{PersonStore, StorageError};
use crate::{FamilyTreeError, Result};

/// How many times a read-modify-write sequence is retried when the store
/// rejects the write with a version conflict.
pub(crate) const CONFLICT_RETRIES: usize = 3;

/// Consume a storage error from an optimistic write: a version conflict
/// within the retry budget asks the caller to re-read and try again, anything
/// else propagates.
pub(crate) fn retry_on_conflict(err: StorageError, attempts: &mut usize) -> Result<()> {
    if matches!(err, StorageError::Conflict(_)) && *attempts < CONFLICT_RETRIES {
        *attempts += 1;
        debug!(attempt = *attempts, "write hit a version conflict, retrying");
        Ok(())
    } else {
        Err(err.into())
    }
}

/// Manages relationship edges between person records.
///
/// Every operation resolves its participants strictly (a missing identifier
/// is `PersonNotFound`, carrying the id and the role searched for) and
/// persists one or more records. The spouse edge is the only bidirectional
/// one: both sides are written in a single atomic store operation, so a
/// concurrent reader never observes the symmetry invariant half-applied.
///
/// All writes are optimistic: each read-modify-write sequence carries the
/// versions it read, and when another mutation of the same record lands in
/// between, the store rejects the write and the sequence re-reads and
/// recomputes. Two concurrent marriages of the same person therefore
/// serialize instead of silently overwriting each other.
#[derive(Debug, Clone)]
pub struct RelationshipManager {
    store: Arc<dyn PersonStore>,
    assembler: PersonAssembler,
}

impl RelationshipManager {
    /// Create a new relationship manager over the given store
    pub fn new(store: Arc<dyn PersonStore>) -> Self {
        let assembler = PersonAssembler::new(Arc::clone(&store));
        Self { store, assembler }
    }

    /// Add a child under a parent.
    ///
    /// Sets the child's `parent_id`; the parent record itself is untouched
    /// because its children collection is a derived view. Returns the
    /// (possibly newly created) child.
    pub async fn add_child(&self, parent_id: &str, target: RelationTarget) -> Result<Person> {
        let parent = self.resolve(parent_id, Role::Parent).await?;

        let child = match target {
            RelationTarget::New(record) => {
                record.validate()?;
                let mut record = record;
                record.id = None;
                let mut child = self.assembler.to_person(&record).await?;
                child.parent_id = Some(parent.id.clone());
                self.store.create_person(child).await?
            }
            RelationTarget::Existing(id) => {
                let mut attempts = 0;
                loop {
                    let mut child = self.resolve(&id, Role::Child).await?;
                    child.parent_id = Some(parent.id.clone());
                    match self.store.update_person(child).await {
                        Ok(updated) => break updated,
                        Err(e) => retry_on_conflict(e, &mut attempts)?,
                    }
                }
            }
        };

        info!(parent_id = %parent.id, child_id = %child.id, "added child");
        Ok(child)
    }

    /// Set the mother reference on a person. No back-reference is recorded
    /// on the mother's side. Returns the updated subject.
    pub async fn set_mother(&self, person_id: &str, target: RelationTarget) -> Result<Person> {
        self.set_single_parent(person_id, target, Role::Mother).await
    }

    /// Set the father reference on a person. No back-reference is recorded
    /// on the father's side. Returns the updated subject.
    pub async fn set_father(&self, person_id: &str, target: RelationTarget) -> Result<Person> {
        self.set_single_parent(person_id, target, Role::Father).await
    }

    async fn set_single_parent(
        &self,
        person_id: &str,
        target: RelationTarget,
        role: Role,
    ) -> Result<Person> {
        // Subject first, so a missing subject reports before the target is
        // resolved or created
        self.resolve(person_id, Role::Person).await?;
        let linked = self.resolve_or_create(target, role).await?;

        let mut attempts = 0;
        let updated = loop {
            let mut subject = self.resolve(person_id, Role::Person).await?;
            match role {
                Role::Mother => subject.mother_id = Some(linked.id.clone()),
                Role::Father => subject.father_id = Some(linked.id.clone()),
                _ => unreachable!("set_single_parent only handles mother and father"),
            }
            match self.store.update_person(subject).await {
                Ok(updated) => break updated,
                Err(e) => retry_on_conflict(e, &mut attempts)?,
            }
        };

        info!(person_id = %updated.id, linked_id = %linked.id, %role, "set parent reference");
        Ok(updated)
    }

    /// Marry two persons.
    ///
    /// Sets `subject.spouse_id` and the spouse's reciprocal reference in one
    /// atomic write. If either party was previously married to someone else,
    /// that stale back-reference is cleared in the same write, so spouse
    /// symmetry holds for every record involved. Returns the updated subject.
    pub async fn set_spouse(&self, person_id: &str, target: RelationTarget) -> Result<Person> {
        // Subject first, so a missing subject reports before an inline
        // target is created; the target is created at most once, retries
        // re-link the same record
        self.resolve(person_id, Role::Person).await?;
        let spouse_id = self.resolve_or_create(target, Role::Spouse).await?.id;

        let mut attempts = 0;
        loop {
            let mut subject = self.resolve(person_id, Role::Person).await?;

            if spouse_id == subject.id {
                // Self-reference: a single record, symmetric by construction.
                // Nothing prevents this; the graph is deliberately unchecked.
                subject.spouse_id = Some(subject.id.clone());
                match self.store.update_person(subject).await {
                    Ok(updated) => return Ok(updated),
                    Err(e) => {
                        retry_on_conflict(e, &mut attempts)?;
                        continue;
                    }
                }
            }

            let mut spouse = self.resolve(&spouse_id, Role::Spouse).await?;

            let mut batch = Vec::new();
            if let Some(stale) = self.stale_partner(&subject, &spouse.id).await? {
                batch.push(stale);
            }
            if let Some(stale) = self.stale_partner(&spouse, &subject.id).await? {
                batch.push(stale);
            }

            subject.spouse_id = Some(spouse.id.clone());
            spouse.spouse_id = Some(subject.id.clone());
            info!(person_id = %subject.id, spouse_id = %spouse.id, "setting spouse on both sides");
            let subject_id = subject.id.clone();
            batch.push(subject);
            batch.push(spouse);

            match self.store.update_many(batch).await {
                Ok(written) => {
                    return written
                        .into_iter()
                        .find(|p| p.id == subject_id)
                        .ok_or_else(|| {
                            FamilyTreeError::Unexpected(
                                "updated subject missing from batch result".to_string(),
                            )
                        });
                }
                Err(e) => retry_on_conflict(e, &mut attempts)?,
            }
        }
    }

    /// A previous partner of `person` whose back-reference must be cleared
    /// when `person` marries `new_partner_id`.
    async fn stale_partner(
        &self,
        person: &Person,
        new_partner_id: &str,
    ) -> Result<Option<Person>> {
        let Some(previous_id) = &person.spouse_id else {
            return Ok(None);
        };
        if previous_id == new_partner_id || previous_id == &person.id {
            return Ok(None);
        }
        // A dangling previous id (partner deleted) has nothing to clear
        match self.store.get_person(previous_id).await? {
            Some(mut previous) if previous.spouse_id.as_deref() == Some(person.id.as_str()) => {
                debug!(person_id = %person.id, previous_id = %previous.id, "clearing stale spouse back-reference");
                previous.spouse_id = None;
                Ok(Some(previous))
            }
            _ => Ok(None),
        }
    }

    /// Dissolve a marriage.
    ///
    /// Clears both sides atomically when the subject is married; a no-op (not
    /// an error) when no spouse is set. A dangling spouse reference clears
    /// the subject side only.
    pub async fn delete_spouse(&self, person_id: &str) -> Result<()> {
        let mut attempts = 0;
        loop {
            let mut subject = self.resolve(person_id, Role::Person).await?;

            let Some(spouse_id) = subject.spouse_id.take() else {
                debug!(person_id = %person_id, "delete_spouse with no spouse set; nothing to do");
                return Ok(());
            };

            let mut batch = vec![subject.clone()];
            if spouse_id != subject.id
                && let Some(mut spouse) = self.store.get_person(&spouse_id).await?
                && spouse.spouse_id.as_deref() == Some(subject.id.as_str())
            {
                spouse.spouse_id = None;
                batch.push(spouse);
            }

            info!(person_id = %subject.id, spouse_id = %spouse_id, "clearing spouse on both sides");
            match self.store.update_many(batch).await {
                Ok(_) => return Ok(()),
                Err(e) => retry_on_conflict(e, &mut attempts)?,
            }
        }
    }

    /// Record a former spouse.
    ///
    /// This is not a true relationship: no edge is persisted on either side.
    /// The subject is existence-checked, and the target is created (inline
    /// data) or fetched (existing identifier) and returned as-is.
    pub async fn add_former_spouse(
        &self,
        person_id: &str,
        target: RelationTarget,
    ) -> Result<Person> {
        let subject = self.resolve(person_id, Role::Person).await?;

        let former = match target {
            RelationTarget::New(record) => {
                record.validate()?;
                let mut record = record;
                record.id = None;
                let person = self.assembler.to_person(&record).await?;
                self.store.create_person(person).await?
            }
            RelationTarget::Existing(id) => self.resolve(&id, Role::FormerSpouse).await?,
        };

        debug!(person_id = %subject.id, former_id = %former.id, "former spouse recorded without an edge");
        Ok(former)
    }

    /// Derived children view: every person whose parent reference equals the
    /// given parent.
    pub async fn children_of(&self, parent_id: &str) -> Result<Vec<Person>> {
        self.resolve(parent_id, Role::Person).await?;
        Ok(self.store.find_children(parent_id).await?)
    }

    /// Strict resolution: a miss fails with `PersonNotFound` carrying the
    /// identifier and the role searched for.
    pub(crate) async fn resolve(&self, id: &str, role: Role) -> Result<Person> {
        self.store
            .get_person(id)
            .await?
            .ok_or_else(|| FamilyTreeError::PersonNotFound {
                id: id.to_string(),
                role,
            })
    }

    async fn resolve_or_create(&self, target: RelationTarget, role: Role) -> Result<Person> {
        match target {
            RelationTarget::New(record) => {
                record.validate()?;
                let mut record = record;
                record.id = None;
                let person = self.assembler.to_person(&record).await?;
                Ok(self.store.create_person(person).await?)
            }
            RelationTarget::Existing(id) => self.resolve(&id, role).await,
        }
    }
}
