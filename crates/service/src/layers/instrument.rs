use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info_span, warn, Instrument, Level};

use crate::chain::{Next, Wrap};
use crate::context::saturating_millis;
use crate::service::Service;

/// Runs the inner chain inside an `execution` span and logs its duration and outcome.
#[derive(Debug, Clone)]
pub struct TracingLayer {
    label: &'static str,
    failure_level: Level,
}

impl TracingLayer {
    pub fn new(label: &'static str) -> Self {
        Self { label, failure_level: Level::WARN }
    }

    /// Log inner failures at `debug` instead of `warn`, for services that fail routinely.
    pub fn quiet_failures(mut self) -> Self {
        self.failure_level = Level::DEBUG;
        self
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl Default for TracingLayer {
    fn default() -> Self {
        Self::new("execution")
    }
}

#[async_trait]
impl<S: Service> Wrap<S> for TracingLayer {
    fn name(&self) -> &'static str {
        "tracing"
    }

    async fn wrap(&self, data: Value, next: Next<'_, S>) -> Result<S::Output, S::Error> {
        let span = info_span!("execution", label = self.label, inner_layers = next.remaining());
        async move {
            let started = Instant::now();
            let result = next.proceed(data).await;
            let elapsed_ms = saturating_millis(started.elapsed());
            match &result {
                Ok(_) => debug!(elapsed_ms, "inner chain succeeded"),
                Err(err) if self.failure_level == Level::WARN => {
                    warn!(elapsed_ms, error = %err, "inner chain failed")
                }
                Err(err) => debug!(elapsed_ms, error = %err, "inner chain failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{AppError, CreateUser, Recorder};
    use crate::ServiceDefinition;
    use serde_json::json;

    #[tokio::test]
    async fn is_transparent_to_results_and_errors() {
        common::utils::logging::init_logging_for_tests();
        let recorder = Recorder::new();
        let definition = ServiceDefinition::<CreateUser>::new().layer(TracingLayer::default());

        let out = definition.run(CreateUser::new(&recorder), json!({"name": "a"})).await.unwrap();
        assert_eq!(out, json!({"name": "a"}));

        let quiet = ServiceDefinition::<CreateUser>::new().layer(TracingLayer::new("quiet").quiet_failures());
        let err = quiet.run(CreateUser::failing(&recorder), json!({"name": "a"})).await.unwrap_err();
        assert!(matches!(err, AppError::Business(_)));
        assert_eq!(recorder.executions(), 2);
    }

    #[test]
    fn reports_its_name() {
        let layer = TracingLayer::new("checkout");
        assert_eq!(Wrap::<CreateUser>::name(&layer), "tracing");
        assert_eq!(layer.label(), "checkout");
    }
}
