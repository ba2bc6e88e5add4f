//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure is an `invalid_request` carrying
//! `details.field` and `details.code`.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, IdentityValidationError};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code,
        }))
    }

    fn with_value(self, code: &str, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code,
        }))
    }
}

/// Validation failure for `field` with a machine-readable `code`.
pub(crate) fn field_error(field: FieldName, code: &str, message: impl Into<String>) -> Error {
    ValidationError::new(field, message).with_code(code)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must be a valid UUID"))
        .with_value("invalid_uuid", value)
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

/// Report an unknown enum value such as a status or priority.
pub(crate) fn invalid_value_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} has an unsupported value"))
        .with_value("invalid_value", value)
}

/// Map identity failures (email and name) onto their request fields.
pub(crate) fn identity_error(err: &IdentityValidationError) -> Error {
    let (field, code) = match err {
        IdentityValidationError::EmptyId | IdentityValidationError::InvalidId => {
            ("userId", "invalid_uuid")
        }
        IdentityValidationError::EmptyEmail => ("email", "missing_field"),
        IdentityValidationError::InvalidEmail => ("email", "invalid_email"),
        IdentityValidationError::EmailTooLong { .. } => ("email", "too_long"),
        IdentityValidationError::EmptyName => ("name", "missing_field"),
        IdentityValidationError::NameTooLong { .. } => ("name", "too_long"),
    };
    field_error(FieldName::new(field), code, err.to_string())
}
