//! In-memory person store
//!
//! Reference backend used for tests and embedded deployments. All writes go
//! through a single `RwLock`, which both serializes concurrent mutations of
//! the same record and makes `update_many` trivially atomic: the lock is held
//! across the whole batch, so a reader sees either none or all of it.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::Person;
use crate::storage::errors::StorageError;
use crate::storage::filters::PersonFilter;
use crate::storage::traits::{BaseStore, PersonStore};

/// In-memory implementation of [`PersonStore`]
#[derive(Debug, Default)]
pub struct InMemoryPersonStore {
    persons: RwLock<HashMap<String, Person>>,
}

impl InMemoryPersonStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self::default()
    }
}

/// The set of ids referenced as someone's parent, computed only when the
/// filter actually asks about children (it needs the whole collection, so
/// `PersonFilter::matches` cannot evaluate it per record).
fn parent_id_set(
    persons: &HashMap<String, Person>,
    filter: Option<&PersonFilter>,
) -> HashSet<String> {
    if filter.is_none_or(|f| f.has_children.is_none()) {
        return HashSet::new();
    }
    persons
        .values()
        .filter_map(|p| p.parent_id.clone())
        .collect()
}

fn matches_has_children(
    filter: &PersonFilter,
    person: &Person,
    parent_ids: &HashSet<String>,
) -> bool {
    filter
        .has_children
        .is_none_or(|wanted| parent_ids.contains(&person.id) == wanted)
}

#[async_trait]
impl BaseStore for InMemoryPersonStore {
    async fn health_check(&self) -> Result<bool, StorageError> {
        Ok(true)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.persons.write().await.clear();
        Ok(())
    }

    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError> {
        let count = self.persons.read().await.len();
        Ok(json!({
            "type": "memory",
            "persons": count,
        }))
    }
}

#[async_trait]
impl PersonStore for InMemoryPersonStore {
    async fn create_person(&self, person: Person) -> Result<Person, StorageError> {
        let mut persons = self.persons.write().await;
        if persons.contains_key(&person.id) {
            return Err(StorageError::AlreadyExists(person.id));
        }
        debug!(person_id = %person.id, "creating person record");
        let mut person = person;
        person.version = 0;
        persons.insert(person.id.clone(), person.clone());
        Ok(person)
    }

    async fn get_person(&self, id: &str) -> Result<Option<Person>, StorageError> {
        Ok(self.persons.read().await.get(id).cloned())
    }

    async fn update_person(&self, person: Person) -> Result<Person, StorageError> {
        let mut persons = self.persons.write().await;
        let Some(stored) = persons.get(&person.id) else {
            return Err(StorageError::NotFound(person.id));
        };
        if stored.version != person.version {
            return Err(StorageError::Conflict(format!(
                "record {} was modified since it was read",
                person.id
            )));
        }
        let mut person = person;
        person.version += 1;
        persons.insert(person.id.clone(), person.clone());
        Ok(person)
    }

    async fn update_many(&self, updates: Vec<Person>) -> Result<Vec<Person>, StorageError> {
        let mut persons = self.persons.write().await;

        // Validate every record before touching any, so a bad batch
        // writes nothing.
        for person in &updates {
            match persons.get(&person.id) {
                None => {
                    return Err(StorageError::Transaction(format!(
                        "cannot update missing record: {}",
                        person.id
                    )));
                }
                Some(stored) if stored.version != person.version => {
                    return Err(StorageError::Conflict(format!(
                        "record {} was modified since it was read",
                        person.id
                    )));
                }
                Some(_) => {}
            }
        }

        let mut written = updates;
        for person in &mut written {
            person.version += 1;
            persons.insert(person.id.clone(), person.clone());
        }
        Ok(written)
    }

    async fn delete_person(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.persons.write().await.remove(id).is_some())
    }

    async fn list_persons(
        &self,
        filter: Option<PersonFilter>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Person>, StorageError> {
        let persons = self.persons.read().await;
        let parent_ids = parent_id_set(&persons, filter.as_ref());
        let mut matched: Vec<Person> = persons
            .values()
            .filter(|person| {
                filter
                    .as_ref()
                    .is_none_or(|f| f.matches(person) && matches_has_children(f, person, &parent_ids))
            })
            .cloned()
            .collect();

        // HashMap iteration order is arbitrary; sort for stable paging
        matched.sort_by(|a, b| a.id.cmp(&b.id));

        let offset = offset.unwrap_or(0);
        let matched: Vec<Person> = match limit {
            Some(limit) => matched.into_iter().skip(offset).take(limit).collect(),
            None => matched.into_iter().skip(offset).collect(),
        };
        Ok(matched)
    }

    async fn count_persons(&self, filter: Option<PersonFilter>) -> Result<usize, StorageError> {
        let persons = self.persons.read().await;
        let parent_ids = parent_id_set(&persons, filter.as_ref());
        Ok(persons
            .values()
            .filter(|person| {
                filter
                    .as_ref()
                    .is_none_or(|f| f.matches(person) && matches_has_children(f, person, &parent_ids))
            })
            .count())
    }

    async fn find_children(&self, parent_id: &str) -> Result<Vec<Person>, StorageError> {
        self.list_persons(
            Some(PersonFilter {
                parent_id: Some(parent_id.to_string()),
                ..Default::default()
            }),
            None,
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::filters::helpers;

    #[tokio::test]
    async fn create_and_get_round_trip() {
        let store = InMemoryPersonStore::new();
        let person = Person::new("p-1", "Ada", "Lovelace");

        store.create_person(person.clone()).await.unwrap();
        let fetched = store.get_person("p-1").await.unwrap();
        assert_eq!(fetched, Some(person));
        assert_eq!(store.get_person("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_id() {
        let store = InMemoryPersonStore::new();
        store
            .create_person(Person::new("p-1", "Ada", "Lovelace"))
            .await
            .unwrap();

        let err = store
            .create_person(Person::new("p-1", "Grace", "Hopper"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn update_requires_existing_record() {
        let store = InMemoryPersonStore::new();
        let err = store
            .update_person(Person::new("p-1", "Ada", "Lovelace"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_rejects_a_stale_version() {
        let store = InMemoryPersonStore::new();
        let created = store
            .create_person(Person::new("p-1", "Ada", "Lovelace"))
            .await
            .unwrap();

        // Two readers take the same snapshot; the slower writer must lose
        let mut first = created.clone();
        let mut second = created.clone();
        first.occupation = Some("Mathematician".to_string());
        second.occupation = Some("Countess".to_string());

        store.update_person(first).await.unwrap();
        let err = store.update_person(second).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        let stored = store.get_person("p-1").await.unwrap().unwrap();
        assert_eq!(stored.occupation.as_deref(), Some("Mathematician"));
    }

    #[tokio::test]
    async fn update_many_rejects_a_stale_version_and_writes_nothing() {
        let store = InMemoryPersonStore::new();
        let ada = store
            .create_person(Person::new("p-1", "Ada", "Lovelace"))
            .await
            .unwrap();
        let grace = store
            .create_person(Person::new("p-2", "Grace", "Hopper"))
            .await
            .unwrap();

        // p-2 is rewritten after the batch read it
        let mut refreshed = grace.clone();
        refreshed.occupation = Some("Rear Admiral".to_string());
        store.update_person(refreshed).await.unwrap();

        let mut ada_edit = ada.clone();
        ada_edit.last_name = "Byron".to_string();
        let err = store.update_many(vec![ada_edit, grace]).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        // The fresh record in the failed batch must not have been written
        let untouched = store.get_person("p-1").await.unwrap().unwrap();
        assert_eq!(untouched.last_name, "Lovelace");
    }

    #[tokio::test]
    async fn update_many_is_all_or_nothing() {
        let store = InMemoryPersonStore::new();
        store
            .create_person(Person::new("p-1", "Ada", "Lovelace"))
            .await
            .unwrap();

        let mut changed = Person::new("p-1", "Ada", "Byron");
        changed.occupation = Some("Mathematician".to_string());
        let ghost = Person::new("p-2", "No", "Body");

        let err = store.update_many(vec![changed, ghost]).await.unwrap_err();
        assert!(matches!(err, StorageError::Transaction(_)));

        // The valid record in the failed batch must not have been written
        let untouched = store.get_person("p-1").await.unwrap().unwrap();
        assert_eq!(untouched.last_name, "Lovelace");
        assert_eq!(untouched.occupation, None);
    }

    #[tokio::test]
    async fn list_filters_and_pages() {
        let store = InMemoryPersonStore::new();
        for (id, first) in [("p-1", "Ada"), ("p-2", "Ada"), ("p-3", "Grace")] {
            store
                .create_person(Person::new(id, first, "Smith"))
                .await
                .unwrap();
        }

        let adas = store
            .list_persons(Some(helpers::by_first_name("Ada")), None, None)
            .await
            .unwrap();
        assert_eq!(adas.len(), 2);

        let paged = store
            .list_persons(None, Some(2), Some(1))
            .await
            .unwrap();
        assert_eq!(paged.len(), 2);
        assert_eq!(paged[0].id, "p-2");

        assert_eq!(store.count_persons(None).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn children_are_derived_from_parent_id() {
        let store = InMemoryPersonStore::new();
        store
            .create_person(Person::new("p-1", "Marie", "Curie"))
            .await
            .unwrap();
        let mut child = Person::new("p-2", "Irene", "Curie");
        child.parent_id = Some("p-1".to_string());
        store.create_person(child).await.unwrap();

        let children = store.find_children("p-1").await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, "p-2");
        assert!(store.find_children("p-2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn has_children_is_evaluated_against_the_collection() {
        let store = InMemoryPersonStore::new();
        store
            .create_person(Person::new("p-1", "Marie", "Curie"))
            .await
            .unwrap();
        store
            .create_person(Person::new("p-2", "Pierre", "Curie"))
            .await
            .unwrap();
        let mut child = Person::new("p-3", "Irene", "Curie");
        child.parent_id = Some("p-1".to_string());
        store.create_person(child).await.unwrap();

        let parents = store
            .list_persons(Some(helpers::has_children()), None, None)
            .await
            .unwrap();
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].id, "p-1");

        assert_eq!(
            store.count_persons(Some(helpers::has_children())).await.unwrap(),
            1
        );
    }
}
