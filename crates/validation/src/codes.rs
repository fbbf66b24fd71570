//! Field-level error tokens reported by the built-in rules.

pub const REQUIRED: &str = "REQUIRED";
pub const CANNOT_BE_EMPTY: &str = "CANNOT_BE_EMPTY";
pub const FORMAT_ERROR: &str = "FORMAT_ERROR";
pub const NOT_ALLOWED_VALUE: &str = "NOT_ALLOWED_VALUE";
pub const TOO_SHORT: &str = "TOO_SHORT";
pub const TOO_LONG: &str = "TOO_LONG";
pub const NOT_INTEGER: &str = "NOT_INTEGER";
pub const NOT_POSITIVE_INTEGER: &str = "NOT_POSITIVE_INTEGER";
pub const NOT_DECIMAL: &str = "NOT_DECIMAL";
pub const NOT_POSITIVE_DECIMAL: &str = "NOT_POSITIVE_DECIMAL";
pub const TOO_LOW: &str = "TOO_LOW";
pub const TOO_HIGH: &str = "TOO_HIGH";
pub const WRONG_EMAIL: &str = "WRONG_EMAIL";
pub const WRONG_UUID: &str = "WRONG_UUID";
pub const WRONG_DATE: &str = "WRONG_DATE";
