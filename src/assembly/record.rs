//! Flat wire representation of a person

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::FamilyTreeError;

/// Wire record for a person.
///
/// Relationship fields carry bare identifiers; there is no nested expansion
/// of related persons, and no parent/children field: the child side of the
/// parent edge is set only through the add-child operation, and the parent
/// side is a derived view.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonRecord {
    /// Identifier; absent on creation, assigned by the store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// First name (required)
    pub first_name: String,

    /// Middle name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,

    /// Last name (required)
    pub last_name: String,

    /// Occupation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,

    /// Life story or biography
    #[serde(skip_serializing_if = "Option::is_none")]
    pub life_story: Option<String>,

    /// Birth date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub born_date: Option<NaiveDate>,

    /// Death date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub died_date: Option<NaiveDate>,

    /// Birth place
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,

    /// Current address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currently_lives_at_address: Option<String>,

    /// Mother identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mother_id: Option<String>,

    /// Father identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_id: Option<String>,

    /// Spouse identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spouse_id: Option<String>,
}

impl PersonRecord {
    /// Create a record with the two required fields set.
    pub fn new<S: Into<String>>(first_name: S, last_name: S) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Default::default()
        }
    }

    /// Structural validation of input fields.
    ///
    /// Returns `ValidationFailed` with a per-field message map when any
    /// required field is missing or blank.
    pub fn validate(&self) -> Result<(), FamilyTreeError> {
        let mut fields = HashMap::new();
        if self.first_name.trim().is_empty() {
            fields.insert("firstName".to_string(), "first name is required".to_string());
        }
        if self.last_name.trim().is_empty() {
            fields.insert("lastName".to_string(), "last name is required".to_string());
        }
        if fields.is_empty() {
            Ok(())
        } else {
            Err(FamilyTreeError::ValidationFailed { fields })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_record_passes() {
        assert!(PersonRecord::new("John", "Doe").validate().is_ok());
    }

    #[test]
    fn blank_names_fail_with_field_map() {
        let record = PersonRecord::new("", "   ");
        let err = record.validate().unwrap_err();
        match err {
            FamilyTreeError::ValidationFailed { fields } => {
                assert!(fields.contains_key("firstName"));
                assert!(fields.contains_key("lastName"));
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn serializes_as_camel_case_and_omits_absent_fields() {
        let mut record = PersonRecord::new("John", "Doe");
        record.mother_id = Some("m-1".to_string());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["firstName"], "John");
        assert_eq!(value["motherId"], "m-1");
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("fatherId"));
        assert!(!obj.contains_key("spouseId"));
        assert!(!obj.contains_key("id"));
    }

    #[test]
    fn deserializes_wire_field_names() {
        let record: PersonRecord = serde_json::from_str(
            r#"{
                "firstName": "John",
                "lastName": "Doe",
                "bornDate": "1980-01-01",
                "currentlyLivesAtAddress": "1 Main St",
                "spouseId": "s-1"
            }"#,
        )
        .unwrap();

        assert_eq!(record.first_name, "John");
        assert_eq!(
            record.born_date,
            chrono::NaiveDate::from_ymd_opt(1980, 1, 1)
        );
        assert_eq!(record.currently_lives_at_address.as_deref(), Some("1 Main St"));
        assert_eq!(record.spouse_id.as_deref(), Some("s-1"));
    }
}
