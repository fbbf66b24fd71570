//! Rule-based input validation.
//!
//! A rule set is a JSON object mapping field names to rule lists:
//!
//! ```
//! use serde_json::json;
//! use validation::{BuiltinEngine, RuleEngine};
//!
//! let validator = BuiltinEngine.compile(&json!({
//!     "name": ["required", "trim", {"max_length": 20}],
//!     "age": "positive_integer",
//! })).unwrap();
//! let clean = validator.validate(&json!({"name": " Ann ", "age": "30", "x": 1})).unwrap();
//! assert_eq!(clean, json!({"name": "Ann", "age": 30}));
//! ```

pub mod codes;
pub mod engine;
pub mod errors;
pub mod rules;
pub mod schema;

pub use engine::{BuiltinEngine, RuleEngine, Validator};
pub use errors::SchemaError;
pub use schema::{FieldErrors, Schema, ROOT_FIELD};
