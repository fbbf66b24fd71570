use thiserror::Error;

/// Problems found while compiling a rule set.
///
/// These describe a programmer mistake in the rule definition, never bad user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("rule set must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("field `{field}`: unknown rule `{rule}`")]
    UnknownRule { field: String, rule: String },
    #[error("field `{field}`: invalid arguments for `{rule}`: {reason}")]
    InvalidArguments { field: String, rule: String, reason: String },
    #[error("field `{field}`: malformed rule: {reason}")]
    MalformedRule { field: String, reason: String },
}

impl SchemaError {
    pub(crate) fn invalid_args(field: &str, rule: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArguments { field: field.to_string(), rule: rule.to_string(), reason: reason.into() }
    }

    pub(crate) fn malformed(field: &str, reason: impl Into<String>) -> Self {
        Self::MalformedRule { field: field.to_string(), reason: reason.into() }
    }
}
