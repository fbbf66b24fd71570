use async_trait::async_trait;
use serde_json::Value;

use crate::context::RunContext;
use crate::errors::{ConfigurationError, ServiceError};

/// A concrete service: rules, authorization and business logic for one operation.
///
/// Instances are per invocation; [`crate::ServiceDefinition::run`] takes them by value.
/// `check_permissions` has no default: every service decides its own authorization.
#[async_trait]
pub trait Service: Send + Sync + 'static {
    type Output: Send + Sync + 'static;
    type Error: From<ServiceError> + From<ConfigurationError> + std::error::Error + Send + Sync + 'static;

    /// Validation rules for this service type. Asked for once per process and cached.
    /// `None` disables validation: absent input becomes `{}`, anything else passes through.
    fn validation_rules() -> Option<Value> {
        None
    }

    /// Return an error to deny. Only ever called with clean data.
    async fn check_permissions(&self, clean: &Value) -> Result<(), Self::Error>;

    async fn execute(&self, clean: Value) -> Result<Self::Output, Self::Error>;

    /// Runs after a successful execution, once timing is stamped into `ctx`.
    async fn on_success(&self, _output: &Self::Output, _ctx: &RunContext) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Runs after a failure in any phase. The error is returned to the caller afterwards.
    async fn on_error(&self, _error: &Self::Error, _ctx: &RunContext) -> Result<(), Self::Error> {
        Ok(())
    }
}
