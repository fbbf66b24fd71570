use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validation::{FieldErrors, SchemaError};

/// Programmer mistakes: malformed rule sets or malformed error codes.
///
/// These never reach `on_error`; they are logged and returned straight to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("invalid validation rules for `{definition}`: {source}")]
    InvalidRules {
        definition: String,
        #[source]
        source: SchemaError,
    },
    #[error("invalid error code {0:?}: codes must be non-empty tokens without whitespace")]
    InvalidErrorCode(String),
}

/// The structured error the pipeline produces: a code plus per-field error tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawServiceError")]
pub struct ServiceError {
    code: String,
    fields: FieldErrors,
}

impl ServiceError {
    pub const VALIDATION_ERROR: &'static str = "VALIDATION_ERROR";
    pub const PERMISSION_DENIED: &'static str = "PERMISSION_DENIED";
    pub const CIRCUIT_OPEN: &'static str = "CIRCUIT_OPEN";

    /// Build an error with a caller-chosen code. Rejects empty or whitespace-bearing codes.
    pub fn new(code: impl Into<String>, fields: FieldErrors) -> Result<Self, ConfigurationError> {
        let code = code.into();
        if code.is_empty() || code.chars().any(char::is_whitespace) {
            return Err(ConfigurationError::InvalidErrorCode(code));
        }
        Ok(Self { code, fields })
    }

    pub fn with_code(code: impl Into<String>) -> Result<Self, ConfigurationError> {
        Self::new(code, FieldErrors::new())
    }

    pub fn validation(fields: FieldErrors) -> Self {
        Self { code: Self::VALIDATION_ERROR.to_string(), fields }
    }

    pub fn permission_denied() -> Self {
        Self { code: Self::PERMISSION_DENIED.to_string(), fields: FieldErrors::new() }
    }

    pub fn circuit_open() -> Self {
        Self { code: Self::CIRCUIT_OPEN.to_string(), fields: FieldErrors::new() }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn fields(&self) -> &FieldErrors {
        &self.fields
    }

    pub fn is_validation(&self) -> bool {
        self.code == Self::VALIDATION_ERROR
    }

    pub fn into_parts(self) -> (String, FieldErrors) {
        (self.code, self.fields)
    }
}

impl Default for ServiceError {
    fn default() -> Self {
        Self::validation(FieldErrors::new())
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        let mut sep = ": ";
        for (field, token) in &self.fields {
            write!(f, "{sep}{field}={token}")?;
            sep = ", ";
        }
        Ok(())
    }
}

impl std::error::Error for ServiceError {}

#[derive(Deserialize)]
struct RawServiceError {
    #[serde(default)]
    code: Option<String>,
    fields: FieldErrors,
}

impl TryFrom<RawServiceError> for ServiceError {
    type Error = ConfigurationError;

    fn try_from(raw: RawServiceError) -> Result<Self, Self::Error> {
        Self::new(raw.code.unwrap_or_else(|| Self::VALIDATION_ERROR.to_string()), raw.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_rejects_bad_codes() {
        assert!(matches!(ServiceError::with_code(""), Err(ConfigurationError::InvalidErrorCode(_))));
        assert!(matches!(ServiceError::with_code("NOT ALLOWED"), Err(ConfigurationError::InvalidErrorCode(_))));
        let err = ServiceError::with_code("QUOTA_EXCEEDED").unwrap();
        assert_eq!(err.code(), "QUOTA_EXCEEDED");
        assert!(err.fields().is_empty());
    }

    #[test]
    fn display_lists_fields_in_order() {
        let fields = FieldErrors::from([
            ("name".to_string(), "REQUIRED".to_string()),
            ("age".to_string(), "NOT_INTEGER".to_string()),
        ]);
        let err = ServiceError::validation(fields);
        assert_eq!(err.to_string(), "VALIDATION_ERROR: age=NOT_INTEGER, name=REQUIRED");
        assert_eq!(ServiceError::permission_denied().to_string(), "PERMISSION_DENIED");
    }

    #[test]
    fn serde_shape_and_checked_deserialization() {
        let err = ServiceError::validation(FieldErrors::from([("name".to_string(), "REQUIRED".to_string())]));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json, serde_json::json!({"code": "VALIDATION_ERROR", "fields": {"name": "REQUIRED"}}));

        let defaulted: ServiceError = serde_json::from_value(serde_json::json!({"fields": {}})).unwrap();
        assert!(defaulted.is_validation());
        assert!(serde_json::from_value::<ServiceError>(serde_json::json!({"code": "X"})).is_err());
        assert!(serde_json::from_value::<ServiceError>(serde_json::json!({"code": "", "fields": {}})).is_err());
    }
}
