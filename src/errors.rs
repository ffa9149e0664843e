//! Structured error body for the transport boundary
//!
//! The routing layer itself is out of scope, but every failure it reports
//! must follow this shape, so programmatic clients can rely on a stable
//! `errorCode` and never see a bare stack trace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::FamilyTreeError;

/// Standardized error response returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// When the error occurred
    pub timestamp: DateTime<Utc>,

    /// HTTP status code
    pub status: u16,

    /// HTTP status text
    pub error: String,

    /// Application-specific stable error code
    pub error_code: String,

    /// Human-readable message
    pub message: String,

    /// Path of the request that caused the error
    pub path: String,
}

impl ErrorResponse {
    /// Build an error body from a domain error and the request path.
    pub fn from_error(err: &FamilyTreeError, path: &str) -> Self {
        let status = err.http_status();
        Self {
            timestamp: Utc::now(),
            status,
            error: status_text(status).to_string(),
            error_code: err.error_code().to_string(),
            message: err.to_string(),
            path: path.to_string(),
        }
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationships::Role;

    #[test]
    fn not_found_maps_to_404_with_stable_code() {
        let err = FamilyTreeError::PersonNotFound {
            id: "p-1".to_string(),
            role: Role::Mother,
        };
        let body = ErrorResponse::from_error(&err, "/api/person/1/mother/p-1");

        assert_eq!(body.status, 404);
        assert_eq!(body.error, "Not Found");
        assert_eq!(body.error_code, "PERSON_NOT_FOUND");
        assert!(body.message.contains("mother"));
        assert!(body.message.contains("p-1"));
    }

    #[test]
    fn unexpected_does_not_leak_internal_detail() {
        let err = FamilyTreeError::Unexpected("lock poisoned at line 42".to_string());
        let body = ErrorResponse::from_error(&err, "/api/person");

        assert_eq!(body.status, 500);
        assert_eq!(body.error_code, "INTERNAL_SERVER_ERROR");
        assert!(!body.message.contains("lock poisoned"));
    }

    #[test]
    fn body_serializes_with_camel_case_keys() {
        let err = FamilyTreeError::InvalidArgument("person id is required for update".to_string());
        let body = ErrorResponse::from_error(&err, "/api/person");
        let value = serde_json::to_value(&body).unwrap();

        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("errorCode"));
        assert!(obj.contains_key("timestamp"));
        assert_eq!(value["status"], 400);
        assert_eq!(value["errorCode"], "ILLEGAL_ARGUMENT");
    }
}
