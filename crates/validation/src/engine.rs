use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::errors::SchemaError;
use crate::schema::{FieldErrors, Schema};

/// A compiled validator: turns raw input into clean data or a field error map.
///
/// Implementations must be deterministic for the same input.
pub trait Validator: Send + Sync + fmt::Debug {
    fn validate(&self, input: &Value) -> Result<Value, FieldErrors>;
}

/// Compiles rule sets into validators.
pub trait RuleEngine: Send + Sync {
    fn compile(&self, rules: &Value) -> Result<Arc<dyn Validator>, SchemaError>;
}

/// Engine backed by the rules in [`crate::rules`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinEngine;

impl RuleEngine for BuiltinEngine {
    fn compile(&self, rules: &Value) -> Result<Arc<dyn Validator>, SchemaError> {
        let schema = Schema::compile(rules)?;
        debug!(fields = schema.len(), "rule set compiled");
        Ok(Arc::new(schema))
    }
}
