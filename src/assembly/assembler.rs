//! Bidirectional mapping between wire records and internal persons

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::assembly::PersonRecord;
use crate::models::Person;
use crate::storage::PersonStore;
use crate::Result;

/// Converts between the flat wire record and the internal person model.
#[derive(Debug, Clone)]
pub struct PersonAssembler {
    store: Arc<dyn PersonStore>,
}

impl PersonAssembler {
    /// Create an assembler over the given store
    pub fn new(store: Arc<dyn PersonStore>) -> Self {
        Self { store }
    }

    /// Inbound assembly: wire record → internal person.
    ///
    /// Relationship identifiers are resolved leniently: an identifier that
    /// does not resolve to a stored person is dropped, leaving the reference
    /// absent. When the record carries no identifier a fresh one is generated.
    ///
    /// The parent edge is never taken from the wire; it is owned by the
    /// add-child operation and preserved separately on update.
    pub async fn to_person(&self, record: &PersonRecord) -> Result<Person> {
        let id = record
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mother_id = self.resolve_lenient(record.mother_id.as_deref(), "motherId").await?;
        let father_id = self.resolve_lenient(record.father_id.as_deref(), "fatherId").await?;
        let spouse_id = self.resolve_lenient(record.spouse_id.as_deref(), "spouseId").await?;

        Ok(Person {
            id,
            first_name: record.first_name.clone(),
            middle_name: record.middle_name.clone(),
            last_name: record.last_name.clone(),
            occupation: record.occupation.clone(),
            life_story: record.life_story.clone(),
            born_date: record.born_date,
            died_date: record.died_date,
            birth_place: record.birth_place.clone(),
            current_address: record.currently_lives_at_address.clone(),
            parent_id: None,
            mother_id,
            father_id,
            spouse_id,
            version: 0,
        })
    }

    /// Outbound assembly: internal person → wire record.
    ///
    /// Each relationship reference is flattened to its stored identifier, or
    /// omitted when absent. Strictly one level: referenced persons are never
    /// expanded, so a graph containing cycles cannot cause unbounded
    /// traversal here.
    pub fn to_record(&self, person: &Person) -> PersonRecord {
        PersonRecord {
            id: Some(person.id.clone()),
            first_name: person.first_name.clone(),
            middle_name: person.middle_name.clone(),
            last_name: person.last_name.clone(),
            occupation: person.occupation.clone(),
            life_story: person.life_story.clone(),
            born_date: person.born_date,
            died_date: person.died_date,
            birth_place: person.birth_place.clone(),
            currently_lives_at_address: person.current_address.clone(),
            mother_id: person.mother_id.clone(),
            father_id: person.father_id.clone(),
            spouse_id: person.spouse_id.clone(),
        }
    }

    /// Lenient resolution: a miss is absence, not an error.
    async fn resolve_lenient(&self, id: Option<&str>, field: &str) -> Result<Option<String>> {
        let Some(id) = id else {
            return Ok(None);
        };
        match self.store.get_person(id).await? {
            Some(person) => Ok(Some(person.id)),
            None => {
                debug!(field, id, "dropping unresolvable relationship identifier");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryPersonStore;

    async fn assembler_with(persons: &[Person]) -> PersonAssembler {
        let store = Arc::new(InMemoryPersonStore::new());
        for person in persons {
            store.create_person(person.clone()).await.unwrap();
        }
        PersonAssembler::new(store)
    }

    #[tokio::test]
    async fn round_trip_preserves_resolvable_identifiers() {
        let mother = Person::new("m-1", "Marie", "Curie");
        let father = Person::new("f-1", "Pierre", "Curie");
        let spouse = Person::new("s-1", "Frederic", "Joliot");
        let assembler = assembler_with(&[mother, father, spouse]).await;

        let mut record = PersonRecord::new("Irene", "Curie");
        record.mother_id = Some("m-1".to_string());
        record.father_id = Some("f-1".to_string());
        record.spouse_id = Some("s-1".to_string());

        let person = assembler.to_person(&record).await.unwrap();
        assert_eq!(person.mother_id.as_deref(), Some("m-1"));
        assert_eq!(person.father_id.as_deref(), Some("f-1"));
        assert_eq!(person.spouse_id.as_deref(), Some("s-1"));

        let out = assembler.to_record(&person);
        assert_eq!(out.mother_id, record.mother_id);
        assert_eq!(out.father_id, record.father_id);
        assert_eq!(out.spouse_id, record.spouse_id);
    }

    #[tokio::test]
    async fn unresolvable_identifier_is_dropped_not_an_error() {
        let assembler = assembler_with(&[]).await;

        let mut record = PersonRecord::new("Irene", "Curie");
        record.mother_id = Some("ghost".to_string());

        let person = assembler.to_person(&record).await.unwrap();
        assert!(person.mother_id.is_none());

        // And the subsequent outbound record omits the field entirely
        let out = assembler.to_record(&person);
        assert!(out.mother_id.is_none());
        let json = serde_json::to_value(&out).unwrap();
        assert!(!json.as_object().unwrap().contains_key("motherId"));
    }

    #[tokio::test]
    async fn missing_id_gets_a_generated_one() {
        let assembler = assembler_with(&[]).await;
        let person = assembler
            .to_person(&PersonRecord::new("John", "Doe"))
            .await
            .unwrap();
        assert!(!person.id.is_empty());

        let mut record = PersonRecord::new("John", "Doe");
        record.id = Some("fixed".to_string());
        let person = assembler.to_person(&record).await.unwrap();
        assert_eq!(person.id, "fixed");
    }

    #[tokio::test]
    async fn outbound_is_one_level_even_for_cyclic_references() {
        // A person married to themselves: flattening must terminate
        let mut narcissus = Person::new("n-1", "Narcissus", "Thespiae");
        narcissus.spouse_id = Some("n-1".to_string());
        let assembler = assembler_with(&[narcissus.clone()]).await;

        let out = assembler.to_record(&narcissus);
        assert_eq!(out.spouse_id.as_deref(), Some("n-1"));
    }
}
