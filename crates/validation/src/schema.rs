use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::codes;
use crate::engine::Validator;
use crate::errors::SchemaError;
use crate::rules::{json_type, run_chain, Failure, Rule};

/// Field path → error token, e.g. `{"address.city": "REQUIRED"}`.
pub type FieldErrors = BTreeMap<String, String>;

/// Key used when the input as a whole has the wrong shape.
pub const ROOT_FIELD: &str = "$";

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub rules: Vec<Rule>,
}

/// Compiled rule set. Field order follows the order of the rule object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn compile(rules: &Value) -> Result<Self, SchemaError> {
        Self::compile_scoped(rules, None)
    }

    pub(crate) fn compile_scoped(rules: &Value, scope: Option<&str>) -> Result<Self, SchemaError> {
        let Value::Object(map) = rules else {
            return Err(SchemaError::NotAnObject(json_type(rules)));
        };
        let fields = map
            .iter()
            .map(|(name, spec)| {
                let label = match scope {
                    Some(parent) => format!("{parent}.{name}"),
                    None => name.clone(),
                };
                Ok(FieldSpec { name: name.clone(), rules: Rule::parse_list(&label, spec)? })
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;
        Ok(Self { fields })
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate an object. Undeclared keys are dropped from the output.
    pub fn apply_map(&self, input: &Map<String, Value>) -> Result<Map<String, Value>, FieldErrors> {
        let mut out = Map::new();
        let mut errors = FieldErrors::new();
        for field in &self.fields {
            match run_chain(&field.rules, input.get(&field.name).cloned()) {
                Ok(Some(value)) => {
                    out.insert(field.name.clone(), value);
                }
                Ok(None) => {}
                Err(Failure::Code(code)) => {
                    errors.insert(field.name.clone(), code.to_string());
                }
                Err(Failure::Nested(inner)) => {
                    for (path, code) in inner {
                        errors.insert(format!("{}.{}", field.name, path), code);
                    }
                }
            }
        }
        if errors.is_empty() { Ok(out) } else { Err(errors) }
    }
}

impl Validator for Schema {
    fn validate(&self, input: &Value) -> Result<Value, FieldErrors> {
        match input {
            Value::Object(map) => self.apply_map(map).map(Value::Object),
            Value::Null => self.apply_map(&Map::new()).map(Value::Object),
            _ => Err(FieldErrors::from([(ROOT_FIELD.to_string(), codes::FORMAT_ERROR.to_string())])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_undeclared_fields() {
        let schema = Schema::compile(&json!({"name": ["required", "string"]})).unwrap();
        let clean = schema.validate(&json!({"name": "a", "extra": 1})).unwrap();
        assert_eq!(clean, json!({"name": "a"}));
    }

    #[test]
    fn collects_one_error_per_field() {
        let schema = Schema::compile(&json!({
            "name": ["required", {"min_length": 3}],
            "age": ["required", "positive_integer"],
            "email": "email",
        }))
        .unwrap();
        let errors = schema.validate(&json!({"name": "ab", "email": "nope"})).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["name"], codes::TOO_SHORT);
        assert_eq!(errors["age"], codes::REQUIRED);
        assert_eq!(errors["email"], codes::WRONG_EMAIL);
    }

    #[test]
    fn nested_object_paths() {
        let schema = Schema::compile(&json!({
            "address": ["required", {"nested_object": {
                "city": "required",
                "zip": {"length_equal": 5},
            }}],
        }))
        .unwrap();
        let errors = schema.validate(&json!({"address": {"zip": "123"}})).unwrap_err();
        assert_eq!(errors["address.city"], codes::REQUIRED);
        assert_eq!(errors["address.zip"], codes::TOO_SHORT);

        let clean = schema.validate(&json!({"address": {"city": "Kyiv", "zip": 12345, "x": 1}})).unwrap();
        assert_eq!(clean, json!({"address": {"city": "Kyiv", "zip": "12345"}}));
    }

    #[test]
    fn null_input_is_treated_as_empty_object() {
        let schema = Schema::compile(&json!({"page": {"default": 1}})).unwrap();
        assert_eq!(schema.validate(&Value::Null).unwrap(), json!({"page": 1}));
    }

    #[test]
    fn non_object_input_is_a_root_format_error() {
        let schema = Schema::compile(&json!({"a": "string"})).unwrap();
        let errors = schema.validate(&json!([1, 2])).unwrap_err();
        assert_eq!(errors[ROOT_FIELD], codes::FORMAT_ERROR);
    }

    #[test]
    fn field_order_is_preserved() {
        let schema = Schema::compile(&json!({"z": "string", "a": "string", "m": "string"})).unwrap();
        assert_eq!(schema.field_names().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn nested_compile_errors_carry_the_full_path() {
        let err = Schema::compile(&json!({"outer": {"nested_object": {"inner": "nope"}}})).unwrap_err();
        assert_eq!(err, SchemaError::UnknownRule { field: "outer.inner".into(), rule: "nope".into() });
        assert_eq!(Schema::compile(&json!(["a"])).unwrap_err(), SchemaError::NotAnObject("array"));
    }
}
