//! Service pipeline: every invocation runs validation, then permissions, then the
//! execution chain, then exactly one lifecycle hook.
//! - Rules are declared once per service type and compiled into a shared validator.
//! - Wrap layers add around-behavior (retry, circuit breaking, scoping, tracing).
//! - Failures surface as the service's own error type; see [`ServiceError`].

pub mod cache;
pub mod chain;
pub mod context;
pub mod definition;
pub mod errors;
pub mod layers;
mod lifecycle;
pub mod service;
#[cfg(test)]
pub mod test_support;
pub mod validate;

pub use cache::{DefinitionId, ValidatorCache};
pub use chain::{BoxFuture, Next, Wrap};
pub use context::{InvocationState, RunContext};
pub use definition::ServiceDefinition;
pub use errors::{ConfigurationError, ServiceError};
pub use service::Service;
pub use validate::{validate_with_rules, validate_with_rules_in};
