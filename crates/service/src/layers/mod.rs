//! Built-in wrap layers.

pub mod circuit_breaker;
pub mod instrument;
pub mod retry;
pub mod scope;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerLayer, CircuitState};
pub use instrument::TracingLayer;
pub use retry::{RetryLayer, RetryPolicy};
pub use scope::{ResourceScope, ScopeLayer};
