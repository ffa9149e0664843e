//! Filter types for person queries

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Person;

/// Filter for person queries.
///
/// All fields are conjunctive: a person matches only if every set field
/// matches. Name and place matches are exact (case-sensitive), mirroring the
/// keyed equality queries the store contract promises.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PersonFilter {
    /// Filter by person ids
    pub ids: Option<Vec<String>>,

    /// Filter by first name (exact match)
    pub first_name: Option<String>,

    /// Filter by last name (exact match)
    pub last_name: Option<String>,

    /// Filter by birth place
    pub birth_place: Option<String>,

    /// Filter by occupation
    pub occupation: Option<String>,

    /// Filter by birth date range (inclusive)
    pub born_after: Option<NaiveDate>,
    pub born_before: Option<NaiveDate>,

    /// Filter by living status: `Some(true)` for living persons
    /// (no death date), `Some(false)` for deceased
    pub living: Option<bool>,

    /// Filter by marital status: `Some(true)` for persons with a spouse
    pub married: Option<bool>,

    /// Filter by parent id (the derived children view)
    pub parent_id: Option<String>,

    /// Filter by whether the person has children, i.e. someone else's
    /// `parent_id` points at them. Unlike the other fields this cannot be
    /// decided from one record, so `matches` ignores it; the store evaluates
    /// it against the whole collection.
    pub has_children: Option<bool>,
}

impl PersonFilter {
    /// Evaluate the per-record fields of this filter against a person.
    /// `has_children` is not decidable here and is applied by the store.
    pub fn matches(&self, person: &Person) -> bool {
        if let Some(ids) = &self.ids
            && !ids.contains(&person.id)
        {
            return false;
        }
        if let Some(first_name) = &self.first_name
            && person.first_name != *first_name
        {
            return false;
        }
        if let Some(last_name) = &self.last_name
            && person.last_name != *last_name
        {
            return false;
        }
        if let Some(birth_place) = &self.birth_place
            && person.birth_place.as_ref() != Some(birth_place)
        {
            return false;
        }
        if let Some(occupation) = &self.occupation
            && person.occupation.as_ref() != Some(occupation)
        {
            return false;
        }
        if let Some(born_after) = &self.born_after {
            match &person.born_date {
                Some(born) if born >= born_after => {}
                _ => return false,
            }
        }
        if let Some(born_before) = &self.born_before {
            match &person.born_date {
                Some(born) if born <= born_before => {}
                _ => return false,
            }
        }
        if let Some(living) = self.living
            && person.is_living() != living
        {
            return false;
        }
        if let Some(married) = self.married
            && person.spouse_id.is_some() != married
        {
            return false;
        }
        if let Some(parent_id) = &self.parent_id
            && person.parent_id.as_ref() != Some(parent_id)
        {
            return false;
        }
        true
    }
}

/// Helper functions for constructing filters
pub mod helpers {
    use super::*;

    /// Filter persons by first name
    pub fn by_first_name(first_name: &str) -> PersonFilter {
        PersonFilter {
            first_name: Some(first_name.to_string()),
            ..Default::default()
        }
    }

    /// Filter persons by last name
    pub fn by_last_name(last_name: &str) -> PersonFilter {
        PersonFilter {
            last_name: Some(last_name.to_string()),
            ..Default::default()
        }
    }

    /// Filter persons by birth place
    pub fn by_birth_place(birth_place: &str) -> PersonFilter {
        PersonFilter {
            birth_place: Some(birth_place.to_string()),
            ..Default::default()
        }
    }

    /// Filter persons by occupation
    pub fn by_occupation(occupation: &str) -> PersonFilter {
        PersonFilter {
            occupation: Some(occupation.to_string()),
            ..Default::default()
        }
    }

    /// Filter persons born between two dates (inclusive)
    pub fn born_between(start: NaiveDate, end: NaiveDate) -> PersonFilter {
        PersonFilter {
            born_after: Some(start),
            born_before: Some(end),
            ..Default::default()
        }
    }

    /// Filter persons who are currently living
    pub fn living() -> PersonFilter {
        PersonFilter {
            living: Some(true),
            ..Default::default()
        }
    }

    /// Filter persons who have died
    pub fn deceased() -> PersonFilter {
        PersonFilter {
            living: Some(false),
            ..Default::default()
        }
    }

    /// Filter persons who have a spouse
    pub fn married() -> PersonFilter {
        PersonFilter {
            married: Some(true),
            ..Default::default()
        }
    }

    /// Filter the children of a given parent
    pub fn children_of(parent_id: &str) -> PersonFilter {
        PersonFilter {
            parent_id: Some(parent_id.to_string()),
            ..Default::default()
        }
    }

    /// Filter persons who have at least one child
    pub fn has_children() -> PersonFilter {
        PersonFilter {
            has_children: Some(true),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Person {
        let mut person = Person::new("p-1", "Ada", "Lovelace");
        person.occupation = Some("Mathematician".to_string());
        person.born_date = NaiveDate::from_ymd_opt(1815, 12, 10);
        person.died_date = NaiveDate::from_ymd_opt(1852, 11, 27);
        person
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(PersonFilter::default().matches(&sample()));
    }

    #[test]
    fn name_filters_are_exact() {
        assert!(helpers::by_first_name("Ada").matches(&sample()));
        assert!(!helpers::by_first_name("ada").matches(&sample()));
        assert!(!helpers::by_last_name("Byron").matches(&sample()));
    }

    #[test]
    fn born_between_is_inclusive() {
        let born = NaiveDate::from_ymd_opt(1815, 12, 10).unwrap();
        assert!(helpers::born_between(born, born).matches(&sample()));

        let later = NaiveDate::from_ymd_opt(1816, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
        assert!(!helpers::born_between(later, end).matches(&sample()));
    }

    #[test]
    fn born_range_requires_a_birth_date() {
        let mut person = sample();
        person.born_date = None;
        let start = NaiveDate::from_ymd_opt(1800, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
        assert!(!helpers::born_between(start, end).matches(&person));
    }

    #[test]
    fn living_and_married_filters() {
        let person = sample();
        assert!(helpers::deceased().matches(&person));
        assert!(!helpers::living().matches(&person));
        assert!(!helpers::married().matches(&person));

        let mut married = person.clone();
        married.spouse_id = Some("p-2".to_string());
        assert!(helpers::married().matches(&married));
    }
}
