//! Validation phase.

use serde_json::{Map, Value};
use tracing::debug;
use validation::{BuiltinEngine, RuleEngine, Validator};

use crate::errors::{ConfigurationError, ServiceError};

/// Run raw input through the definition's validator.
///
/// Without a validator, absent or `null` input becomes `{}` and anything else is passed
/// through unchanged.
pub(crate) fn validate(validator: Option<&dyn Validator>, raw: Option<&Value>) -> Result<Value, ServiceError> {
    match validator {
        None => Ok(match raw {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(value) => value.clone(),
        }),
        Some(validator) => validator.validate(raw.unwrap_or(&Value::Null)).map_err(|fields| {
            debug!(failed_fields = fields.len(), "input rejected by validator");
            ServiceError::validation(fields)
        }),
    }
}

/// Validate `data` against an ad-hoc rule set with the built-in engine.
///
/// The validator is compiled fresh on every call and never cached, which makes this
/// suitable for a second validation stage chosen at runtime (e.g. by a discriminator).
///
/// ```
/// use serde_json::json;
/// use service::{validate_with_rules, ServiceError, ConfigurationError};
///
/// #[derive(Debug, thiserror::Error)]
/// enum AppError {
///     #[error(transparent)] Service(#[from] ServiceError),
///     #[error(transparent)] Config(#[from] ConfigurationError),
/// }
///
/// let clean: Result<_, AppError> = validate_with_rules(&json!({"kind": "card", "pan": "4111"}), &json!({"pan": "required"}));
/// assert_eq!(clean.unwrap(), json!({"pan": "4111"}));
/// ```
pub fn validate_with_rules<E>(data: &Value, rules: &Value) -> Result<Value, E>
where
    E: From<ServiceError> + From<ConfigurationError>,
{
    validate_with_rules_in(&BuiltinEngine, data, rules)
}

/// [`validate_with_rules`] with an explicit engine.
pub fn validate_with_rules_in<E>(engine: &dyn RuleEngine, data: &Value, rules: &Value) -> Result<Value, E>
where
    E: From<ServiceError> + From<ConfigurationError>,
{
    let validator = engine.compile(rules).map_err(|source| ConfigurationError::InvalidRules {
        definition: "<ad-hoc rules>".to_string(),
        source,
    })?;
    Ok(validate(Some(validator.as_ref()), Some(data))?)
}
