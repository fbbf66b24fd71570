//! Service pipeline facade.
//!
//! Re-exports the workspace crates and wires the config file into logging and the
//! built-in layers.

pub use common;
pub use configs;
pub use service;
pub use validation;

pub use configs::PipelineConfig;
pub use service::{
    ConfigurationError, InvocationState, Next, RunContext, Service, ServiceDefinition, ServiceError, Wrap,
};

use service::layers::{CircuitBreakerLayer, RetryLayer, TracingLayer};
use tracing::info;

/// Load the config (`PIPELINE_CONFIG_PATH`, default `pipeline.toml`; missing file means
/// defaults) and install the tracing subscriber it describes.
pub fn bootstrap() -> anyhow::Result<PipelineConfig> {
    let config = PipelineConfig::load_or_default()?;
    common::utils::logging::init_logging_from_config(&config.logging);
    info!(
        retry_enabled = config.retry.enabled,
        circuit_breaker_enabled = config.circuit_breaker.enabled,
        "pipeline configured"
    );
    Ok(config)
}

/// A definition carrying the configured layers, outermost first: tracing, circuit
/// breaker, retry. The breaker sees one failure per exhausted retry sequence.
pub fn configured_definition<S, F>(config: &PipelineConfig, retryable: F) -> ServiceDefinition<S>
where
    S: Service,
    F: Fn(&S::Error) -> bool + Send + Sync + 'static,
{
    ServiceDefinition::new()
        .layer(RetryLayer::from_config(&config.retry, retryable))
        .layer(CircuitBreakerLayer::from_config(&config.circuit_breaker))
        .layer(TracingLayer::default())
}
