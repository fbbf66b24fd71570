use chrono::NaiveDate;
use serde_json::Value;

use crate::codes;
use crate::errors::SchemaError;
use crate::schema::{FieldErrors, Schema};

/// A single compiled rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    NotEmpty,
    NotEmptyList,
    AnyObject,
    String,
    Eq(Value),
    OneOf(Vec<Value>),
    MinLength(usize),
    MaxLength(usize),
    LengthEqual(usize),
    LengthBetween(usize, usize),
    Integer,
    PositiveInteger,
    Decimal,
    PositiveDecimal,
    MinNumber(f64),
    MaxNumber(f64),
    NumberBetween(f64, f64),
    Email,
    Uuid,
    IsoDate,
    Boolean,
    Trim,
    ToLc,
    ToUc,
    Default(Value),
    NestedObject(Schema),
    ListOf(Vec<Rule>),
}

/// Why a value was rejected.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Failure {
    Code(&'static str),
    /// Errors of a nested structure, keyed by paths relative to the field.
    Nested(FieldErrors),
}

type Outcome = Result<Option<Value>, Failure>;

fn fail(code: &'static str) -> Outcome {
    Err(Failure::Code(code))
}

impl Rule {
    /// Parse one rule: either a bare name or a single-key object carrying arguments.
    pub fn parse(field: &str, spec: &Value) -> Result<Rule, SchemaError> {
        match spec {
            Value::String(name) => Self::from_name(field, name),
            Value::Object(map) => {
                if map.len() != 1 {
                    return Err(SchemaError::malformed(
                        field,
                        format!("rule object must have exactly one key, found {}", map.len()),
                    ));
                }
                match map.iter().next() {
                    Some((name, args)) => Self::with_args(field, name, args),
                    None => Err(SchemaError::malformed(field, "empty rule object")),
                }
            }
            other => Err(SchemaError::malformed(
                field,
                format!("expected a rule name or object, got {}", json_type(other)),
            )),
        }
    }

    /// Parse a field's rule list; a lone rule is accepted in place of a one-element list.
    pub fn parse_list(field: &str, spec: &Value) -> Result<Vec<Rule>, SchemaError> {
        match spec {
            Value::Array(items) => items.iter().map(|item| Self::parse(field, item)).collect(),
            single => Ok(vec![Self::parse(field, single)?]),
        }
    }

    fn from_name(field: &str, name: &str) -> Result<Rule, SchemaError> {
        let rule = match name {
            "required" => Rule::Required,
            "not_empty" => Rule::NotEmpty,
            "not_empty_list" => Rule::NotEmptyList,
            "any_object" => Rule::AnyObject,
            "string" => Rule::String,
            "integer" => Rule::Integer,
            "positive_integer" => Rule::PositiveInteger,
            "decimal" => Rule::Decimal,
            "positive_decimal" => Rule::PositiveDecimal,
            "email" => Rule::Email,
            "uuid" => Rule::Uuid,
            "iso_date" => Rule::IsoDate,
            "boolean" => Rule::Boolean,
            "trim" => Rule::Trim,
            "to_lc" => Rule::ToLc,
            "to_uc" => Rule::ToUc,
            "eq" | "one_of" | "min_length" | "max_length" | "length_equal" | "length_between"
            | "min_number" | "max_number" | "number_between" | "default" | "nested_object"
            | "list_of" => {
                return Err(SchemaError::invalid_args(field, name, "arguments required"));
            }
            _ => {
                return Err(SchemaError::UnknownRule { field: field.to_string(), rule: name.to_string() });
            }
        };
        Ok(rule)
    }

    fn with_args(field: &str, name: &str, args: &Value) -> Result<Rule, SchemaError> {
        let rule = match name {
            "eq" => Rule::Eq(single_arg(field, name, args)?.clone()),
            "one_of" => Rule::OneOf(allowed_values(field, name, args)?),
            "min_length" => Rule::MinLength(length_arg(field, name, single_arg(field, name, args)?)?),
            "max_length" => Rule::MaxLength(length_arg(field, name, single_arg(field, name, args)?)?),
            "length_equal" => Rule::LengthEqual(length_arg(field, name, single_arg(field, name, args)?)?),
            "length_between" => {
                let (min, max) = pair_args(field, name, args)?;
                let (min, max) = (length_arg(field, name, min)?, length_arg(field, name, max)?);
                if min > max {
                    return Err(SchemaError::invalid_args(field, name, "min is greater than max"));
                }
                Rule::LengthBetween(min, max)
            }
            "min_number" => Rule::MinNumber(number_arg(field, name, single_arg(field, name, args)?)?),
            "max_number" => Rule::MaxNumber(number_arg(field, name, single_arg(field, name, args)?)?),
            "number_between" => {
                let (min, max) = pair_args(field, name, args)?;
                let (min, max) = (number_arg(field, name, min)?, number_arg(field, name, max)?);
                if min > max {
                    return Err(SchemaError::invalid_args(field, name, "min is greater than max"));
                }
                Rule::NumberBetween(min, max)
            }
            "default" => Rule::Default(single_arg(field, name, args)?.clone()),
            "nested_object" => Rule::NestedObject(Schema::compile_scoped(args, Some(field))?),
            "list_of" => Rule::ListOf(Rule::parse_list(field, args)?),
            other => {
                let rule = Self::from_name(field, other)?;
                let no_args = args.is_null() || args.as_array().is_some_and(|a| a.is_empty());
                if !no_args {
                    return Err(SchemaError::invalid_args(field, other, "rule takes no arguments"));
                }
                rule
            }
        };
        Ok(rule)
    }

    /// Apply the rule to a possibly-absent value, returning the (possibly coerced) value.
    pub(crate) fn apply(&self, value: Option<Value>) -> Outcome {
        match self {
            Rule::Required => {
                if is_no_value(&value) { fail(codes::REQUIRED) } else { Ok(value) }
            }
            Rule::NotEmpty => {
                let empty = matches!(&value, Some(Value::String(s)) if s.is_empty());
                if empty { fail(codes::CANNOT_BE_EMPTY) } else { Ok(value) }
            }
            Rule::NotEmptyList => {
                let verdict = match &value {
                    Some(Value::Array(items)) if !items.is_empty() => None,
                    Some(Value::Array(_)) | None | Some(Value::Null) => Some(codes::CANNOT_BE_EMPTY),
                    Some(Value::String(s)) if s.is_empty() => Some(codes::CANNOT_BE_EMPTY),
                    Some(_) => Some(codes::FORMAT_ERROR),
                };
                match verdict {
                    Some(code) => fail(code),
                    None => Ok(value),
                }
            }
            Rule::Default(default) => {
                if is_no_value(&value) { Ok(Some(default.clone())) } else { Ok(value) }
            }
            _ => match value {
                Some(v) if !is_empty(&v) => self.apply_present(v),
                other => Ok(other),
            },
        }
    }

    fn apply_present(&self, value: Value) -> Outcome {
        match self {
            Rule::AnyObject => {
                if value.is_object() { Ok(Some(value)) } else { fail(codes::FORMAT_ERROR) }
            }
            Rule::String => match primitive_string(&value) {
                Some(s) => Ok(Some(Value::String(s))),
                None => fail(codes::FORMAT_ERROR),
            },
            Rule::Eq(allowed) => pick_allowed(&value, std::slice::from_ref(allowed)),
            Rule::OneOf(allowed) => pick_allowed(&value, allowed),
            Rule::MinLength(min) => check_length(&value, |len| {
                if len < *min { Some(codes::TOO_SHORT) } else { None }
            }),
            Rule::MaxLength(max) => check_length(&value, |len| {
                if len > *max { Some(codes::TOO_LONG) } else { None }
            }),
            Rule::LengthEqual(expected) => check_length(&value, |len| match len.cmp(expected) {
                std::cmp::Ordering::Less => Some(codes::TOO_SHORT),
                std::cmp::Ordering::Greater => Some(codes::TOO_LONG),
                std::cmp::Ordering::Equal => None,
            }),
            Rule::LengthBetween(min, max) => check_length(&value, |len| {
                if len < *min {
                    Some(codes::TOO_SHORT)
                } else if len > *max {
                    Some(codes::TOO_LONG)
                } else {
                    None
                }
            }),
            Rule::Integer => {
                if let Some(exact) = exact_integer(&value) {
                    return Ok(Some(exact));
                }
                let n = numeric(&value, codes::NOT_INTEGER)?;
                if n.fract() != 0.0 { fail(codes::NOT_INTEGER) } else { Ok(Some(number_value(n))) }
            }
            Rule::PositiveInteger => {
                if let Some(exact) = exact_integer(&value) {
                    return if exact.as_u64().is_some_and(|n| n > 0) {
                        Ok(Some(exact))
                    } else {
                        fail(codes::NOT_POSITIVE_INTEGER)
                    };
                }
                let n = numeric(&value, codes::NOT_POSITIVE_INTEGER)?;
                if n.fract() != 0.0 || n <= 0.0 {
                    fail(codes::NOT_POSITIVE_INTEGER)
                } else {
                    Ok(Some(number_value(n)))
                }
            }
            Rule::Decimal => Ok(Some(number_value(numeric(&value, codes::NOT_DECIMAL)?))),
            Rule::PositiveDecimal => {
                let n = numeric(&value, codes::NOT_POSITIVE_DECIMAL)?;
                if n <= 0.0 { fail(codes::NOT_POSITIVE_DECIMAL) } else { Ok(Some(number_value(n))) }
            }
            Rule::MinNumber(min) => {
                let n = numeric(&value, codes::FORMAT_ERROR)?;
                if n < *min { fail(codes::TOO_LOW) } else { Ok(Some(number_value(n))) }
            }
            Rule::MaxNumber(max) => {
                let n = numeric(&value, codes::FORMAT_ERROR)?;
                if n > *max { fail(codes::TOO_HIGH) } else { Ok(Some(number_value(n))) }
            }
            Rule::NumberBetween(min, max) => {
                let n = numeric(&value, codes::FORMAT_ERROR)?;
                if n < *min {
                    fail(codes::TOO_LOW)
                } else if n > *max {
                    fail(codes::TOO_HIGH)
                } else {
                    Ok(Some(number_value(n)))
                }
            }
            Rule::Email => match primitive_string(&value) {
                Some(s) if looks_like_email(&s) => Ok(Some(Value::String(s))),
                Some(_) => fail(codes::WRONG_EMAIL),
                None => fail(codes::FORMAT_ERROR),
            },
            Rule::Uuid => match primitive_string(&value) {
                Some(s) if uuid::Uuid::parse_str(&s).is_ok() => Ok(Some(Value::String(s))),
                Some(_) => fail(codes::WRONG_UUID),
                None => fail(codes::FORMAT_ERROR),
            },
            Rule::IsoDate => match primitive_string(&value) {
                Some(s) if NaiveDate::parse_from_str(&s, "%Y-%m-%d").is_ok() => Ok(Some(Value::String(s))),
                Some(_) => fail(codes::WRONG_DATE),
                None => fail(codes::FORMAT_ERROR),
            },
            Rule::Boolean => match &value {
                Value::Bool(b) => Ok(Some(Value::Bool(*b))),
                Value::String(s) if s == "true" || s == "1" => Ok(Some(Value::Bool(true))),
                Value::String(s) if s == "false" || s == "0" => Ok(Some(Value::Bool(false))),
                Value::Number(n) if n.as_f64() == Some(1.0) => Ok(Some(Value::Bool(true))),
                Value::Number(n) if n.as_f64() == Some(0.0) => Ok(Some(Value::Bool(false))),
                _ => fail(codes::FORMAT_ERROR),
            },
            Rule::Trim => Ok(Some(map_string(value, |s| s.trim().to_string()))),
            Rule::ToLc => Ok(Some(map_string(value, |s| s.to_lowercase()))),
            Rule::ToUc => Ok(Some(map_string(value, |s| s.to_uppercase()))),
            Rule::NestedObject(schema) => match value {
                Value::Object(map) => schema.apply_map(&map).map(|m| Some(Value::Object(m))).map_err(Failure::Nested),
                _ => fail(codes::FORMAT_ERROR),
            },
            Rule::ListOf(rules) => match value {
                Value::Array(items) => apply_list(rules, items),
                _ => fail(codes::FORMAT_ERROR),
            },
            Rule::Required | Rule::NotEmpty | Rule::NotEmptyList | Rule::Default(_) => Ok(Some(value)),
        }
    }
}

/// Run a field's rules in order; the first failure wins.
pub(crate) fn run_chain(rules: &[Rule], mut value: Option<Value>) -> Outcome {
    for rule in rules {
        value = rule.apply(value)?;
    }
    Ok(value)
}

fn apply_list(rules: &[Rule], items: Vec<Value>) -> Outcome {
    let mut out = Vec::with_capacity(items.len());
    let mut errors = FieldErrors::new();
    for (idx, item) in items.into_iter().enumerate() {
        match run_chain(rules, Some(item)) {
            Ok(v) => out.push(v.unwrap_or(Value::Null)),
            Err(Failure::Code(code)) => {
                errors.insert(idx.to_string(), code.to_string());
            }
            Err(Failure::Nested(inner)) => {
                for (path, code) in inner {
                    errors.insert(format!("{idx}.{path}"), code);
                }
            }
        }
    }
    if errors.is_empty() { Ok(Some(Value::Array(out))) } else { Err(Failure::Nested(errors)) }
}

fn pick_allowed(value: &Value, allowed: &[Value]) -> Outcome {
    let Some(given) = primitive_string(value) else {
        return fail(codes::FORMAT_ERROR);
    };
    allowed
        .iter()
        .find(|candidate| primitive_string(candidate).as_deref() == Some(given.as_str()))
        .map(|candidate| Some(candidate.clone()))
        .ok_or(Failure::Code(codes::NOT_ALLOWED_VALUE))
}

fn check_length(value: &Value, verdict: impl Fn(usize) -> Option<&'static str>) -> Outcome {
    let Some(s) = primitive_string(value) else {
        return fail(codes::FORMAT_ERROR);
    };
    match verdict(s.chars().count()) {
        Some(code) => fail(code),
        None => Ok(Some(Value::String(s))),
    }
}

fn numeric(value: &Value, code: &'static str) -> Result<f64, Failure> {
    match value {
        Value::Number(n) => n.as_f64().ok_or(Failure::Code(code)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or(Failure::Code(code)),
        _ => Err(Failure::Code(codes::FORMAT_ERROR)),
    }
}

/// Integers representable as `i64`/`u64`, kept exact rather than routed through `f64`.
fn exact_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(Value::Number(n.clone())),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().map(Value::from).or_else(|_| s.parse::<u64>().map(Value::from)).ok()
        }
        _ => None,
    }
}

fn number_value(n: f64) -> Value {
    const MAX_SAFE: f64 = 9_007_199_254_740_992.0;
    if n.fract() == 0.0 && n.abs() < MAX_SAFE {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

fn map_string(value: Value, f: impl FnOnce(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(&s)),
        other => other,
    }
}

fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !s.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
}

fn primitive_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn is_no_value(value: &Option<Value>) -> bool {
    value.as_ref().map_or(true, is_empty)
}

fn single_arg<'a>(field: &str, rule: &str, args: &'a Value) -> Result<&'a Value, SchemaError> {
    match args {
        Value::Array(items) if items.len() == 1 => Ok(&items[0]),
        Value::Array(items) => Err(SchemaError::invalid_args(
            field,
            rule,
            format!("expected one argument, got {}", items.len()),
        )),
        other => Ok(other),
    }
}

fn pair_args<'a>(field: &str, rule: &str, args: &'a Value) -> Result<(&'a Value, &'a Value), SchemaError> {
    match args {
        Value::Array(items) if items.len() == 2 => Ok((&items[0], &items[1])),
        _ => Err(SchemaError::invalid_args(field, rule, "expected [min, max]")),
    }
}

fn allowed_values(field: &str, rule: &str, args: &Value) -> Result<Vec<Value>, SchemaError> {
    let items = match args {
        Value::Array(items) => match items.as_slice() {
            [Value::Array(inner)] => inner.clone(),
            _ => items.clone(),
        },
        _ => return Err(SchemaError::invalid_args(field, rule, "expected a list of allowed values")),
    };
    if items.iter().any(|v| primitive_string(v).is_none()) {
        return Err(SchemaError::invalid_args(field, rule, "allowed values must be primitives"));
    }
    Ok(items)
}

fn length_arg(field: &str, rule: &str, arg: &Value) -> Result<usize, SchemaError> {
    arg.as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| SchemaError::invalid_args(field, rule, "expected a non-negative integer"))
}

fn number_arg(field: &str, rule: &str, arg: &Value) -> Result<f64, SchemaError> {
    arg.as_f64().ok_or_else(|| SchemaError::invalid_args(field, rule, "expected a number"))
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apply(spec: Value, value: Option<Value>) -> Outcome {
        let rules = Rule::parse_list("f", &spec).expect("rules parse");
        run_chain(&rules, value)
    }

    #[test]
    fn required_rejects_absent_null_and_empty_string() {
        assert_eq!(apply(json!("required"), None), fail(codes::REQUIRED));
        assert_eq!(apply(json!("required"), Some(Value::Null)), fail(codes::REQUIRED));
        assert_eq!(apply(json!("required"), Some(json!(""))), fail(codes::REQUIRED));
        assert_eq!(apply(json!("required"), Some(json!(0))), Ok(Some(json!(0))));
    }

    #[test]
    fn optional_rules_skip_missing_values() {
        assert_eq!(apply(json!(["integer", {"max_length": 2}]), None), Ok(None));
        assert_eq!(apply(json!("email"), Some(json!(""))), Ok(Some(json!(""))));
    }

    #[test]
    fn numeric_rules_coerce_strings() {
        assert_eq!(apply(json!("integer"), Some(json!("42"))), Ok(Some(json!(42))));
        assert_eq!(apply(json!("integer"), Some(json!("4.2"))), fail(codes::NOT_INTEGER));
        assert_eq!(apply(json!("integer"), Some(json!("NaN"))), fail(codes::NOT_INTEGER));
        assert_eq!(apply(json!("positive_integer"), Some(json!(0))), fail(codes::NOT_POSITIVE_INTEGER));
        assert_eq!(apply(json!("decimal"), Some(json!("1.5"))), Ok(Some(json!(1.5))));
        assert_eq!(apply(json!({"number_between": [1, 3]}), Some(json!(4))), fail(codes::TOO_HIGH));
        assert_eq!(apply(json!({"min_number": 10}), Some(json!([1]))), fail(codes::FORMAT_ERROR));
    }

    #[test]
    fn integer_rules_keep_large_values_exact() {
        let big = 9_007_199_254_740_993_u64;
        assert_eq!(apply(json!("integer"), Some(json!(big))), Ok(Some(json!(big))));
        assert_eq!(apply(json!("integer"), Some(json!("9007199254740993"))), Ok(Some(json!(big))));
        assert_eq!(apply(json!("positive_integer"), Some(json!(u64::MAX))), Ok(Some(json!(u64::MAX))));
        assert_eq!(apply(json!("integer"), Some(json!(i64::MIN))), Ok(Some(json!(i64::MIN))));
        assert_eq!(apply(json!("positive_integer"), Some(json!("-9007199254740993"))), fail(codes::NOT_POSITIVE_INTEGER));
        assert_eq!(apply(json!("positive_integer"), Some(json!("0"))), fail(codes::NOT_POSITIVE_INTEGER));
        assert_eq!(apply(json!("integer"), Some(json!(4.0))), Ok(Some(json!(4))));
    }

    #[test]
    fn string_rules_check_length_in_chars() {
        assert_eq!(apply(json!({"max_length": 3}), Some(json!("ção"))), Ok(Some(json!("ção"))));
        assert_eq!(apply(json!({"min_length": 2}), Some(json!("a"))), fail(codes::TOO_SHORT));
        assert_eq!(apply(json!({"length_between": [1, 2]}), Some(json!("abc"))), fail(codes::TOO_LONG));
        assert_eq!(apply(json!("string"), Some(json!(12))), Ok(Some(json!("12"))));
        assert_eq!(apply(json!("string"), Some(json!({"a": 1}))), fail(codes::FORMAT_ERROR));
    }

    #[test]
    fn one_of_matches_on_string_form_and_returns_allowed_value() {
        let spec = json!({"one_of": [1, 2, 3]});
        assert_eq!(apply(spec.clone(), Some(json!("2"))), Ok(Some(json!(2))));
        assert_eq!(apply(spec, Some(json!(5))), fail(codes::NOT_ALLOWED_VALUE));
        assert_eq!(apply(json!({"one_of": [["a", "b"]]}), Some(json!("b"))), Ok(Some(json!("b"))));
    }

    #[test]
    fn modifiers_and_default() {
        assert_eq!(apply(json!(["trim", "to_lc"]), Some(json!("  MiXeD "))), Ok(Some(json!("mixed"))));
        assert_eq!(apply(json!({"default": "guest"}), None), Ok(Some(json!("guest"))));
        assert_eq!(apply(json!(["trim", "required"]), Some(json!("   "))), fail(codes::REQUIRED));
    }

    #[test]
    fn special_formats() {
        assert_eq!(apply(json!("email"), Some(json!("a@b.io"))), Ok(Some(json!("a@b.io"))));
        assert_eq!(apply(json!("email"), Some(json!("a@b"))), fail(codes::WRONG_EMAIL));
        assert_eq!(apply(json!("uuid"), Some(json!("nope"))), fail(codes::WRONG_UUID));
        assert_eq!(apply(json!("iso_date"), Some(json!("2024-02-30"))), fail(codes::WRONG_DATE));
        assert_eq!(apply(json!("boolean"), Some(json!("false"))), Ok(Some(json!(false))));
    }

    #[test]
    fn list_of_reports_indexed_paths() {
        let out = apply(json!({"list_of": ["required", "positive_integer"]}), Some(json!([1, "x", 3])));
        let mut expected = FieldErrors::new();
        expected.insert("1".into(), codes::NOT_POSITIVE_INTEGER.into());
        assert_eq!(out, Err(Failure::Nested(expected)));
    }

    #[test]
    fn not_empty_list() {
        assert_eq!(apply(json!("not_empty_list"), Some(json!([]))), fail(codes::CANNOT_BE_EMPTY));
        assert_eq!(apply(json!("not_empty_list"), Some(json!("x"))), fail(codes::FORMAT_ERROR));
        assert_eq!(apply(json!("not_empty_list"), Some(json!([1]))), Ok(Some(json!([1]))));
    }

    #[test]
    fn parse_rejects_bad_arguments() {
        assert!(matches!(Rule::parse("f", &json!("max_length")), Err(SchemaError::InvalidArguments { .. })));
        assert!(matches!(Rule::parse("f", &json!({"max_length": "ten"})), Err(SchemaError::InvalidArguments { .. })));
        assert!(matches!(Rule::parse("f", &json!({"required": [1]})), Err(SchemaError::InvalidArguments { .. })));
        assert!(matches!(Rule::parse("f", &json!("bogus")), Err(SchemaError::UnknownRule { .. })));
        assert!(matches!(Rule::parse("f", &json!(7)), Err(SchemaError::MalformedRule { .. })));
        assert!(matches!(Rule::parse("f", &json!({"a": 1, "b": 2})), Err(SchemaError::MalformedRule { .. })));
        assert_eq!(Rule::parse("f", &json!({"required": []})), Ok(Rule::Required));
    }
}
