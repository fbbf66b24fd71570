use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use configs::CircuitBreakerConfig;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::chain::{Next, Wrap};
use crate::errors::ServiceError;
use crate::service::Service;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    /// Failing fast until the recovery timeout passes.
    Open,
    /// Letting a bounded number of trial calls through.
    HalfOpen,
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    failure_count: u64,
    half_open_admitted: u64,
    half_open_successes: u64,
    opened_at: Option<Instant>,
    failure_threshold: u64,
    recovery_timeout: Duration,
    half_open_max_calls: u64,
}

impl BreakerState {
    fn new(failure_threshold: u64, recovery_timeout: Duration, half_open_max_calls: u64) -> Self {
        Self {
            state: CircuitState::Closed,
            failure_count: 0,
            half_open_admitted: 0,
            half_open_successes: 0,
            opened_at: None,
            failure_threshold: failure_threshold.max(1),
            recovery_timeout,
            half_open_max_calls: half_open_max_calls.max(1),
        }
    }

    fn try_acquire(&mut self) -> bool {
        match self.state {
            CircuitState::Closed => true,
            CircuitState::Open => match self.opened_at {
                Some(opened) if opened.elapsed() >= self.recovery_timeout => {
                    info!("circuit breaker half-open, admitting trial calls");
                    self.state = CircuitState::HalfOpen;
                    self.half_open_admitted = 1;
                    self.half_open_successes = 0;
                    true
                }
                _ => false,
            },
            CircuitState::HalfOpen => {
                if self.half_open_admitted < self.half_open_max_calls {
                    self.half_open_admitted += 1;
                    true
                } else {
                    false
                }
            }
        }
    }

    fn record_success(&mut self) {
        match self.state {
            CircuitState::Closed => self.failure_count = 0,
            CircuitState::HalfOpen => {
                self.half_open_successes += 1;
                if self.half_open_successes >= self.half_open_max_calls {
                    info!("circuit breaker closed after successful trial calls");
                    self.close();
                }
            }
            CircuitState::Open => self.close(),
        }
    }

    fn record_failure(&mut self) {
        self.failure_count += 1;
        match self.state {
            CircuitState::Closed if self.failure_count >= self.failure_threshold => {
                warn!(failures = self.failure_count, "circuit breaker opened");
                self.open();
            }
            CircuitState::Closed => {}
            CircuitState::HalfOpen => {
                warn!("trial call failed, circuit breaker re-opened");
                self.open();
            }
            CircuitState::Open => self.opened_at = Some(Instant::now()),
        }
    }

    fn open(&mut self) {
        self.state = CircuitState::Open;
        self.opened_at = Some(Instant::now());
        self.half_open_admitted = 0;
        self.half_open_successes = 0;
    }

    fn close(&mut self) {
        self.state = CircuitState::Closed;
        self.failure_count = 0;
        self.half_open_admitted = 0;
        self.half_open_successes = 0;
        self.opened_at = None;
    }
}

/// Shared breaker state. Clones observe and update the same circuit.
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    inner: Arc<Mutex<BreakerState>>,
    enabled: bool,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u64, recovery_timeout: Duration, half_open_max_calls: u64, enabled: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BreakerState::new(
                failure_threshold,
                recovery_timeout,
                half_open_max_calls,
            ))),
            enabled,
        }
    }

    pub fn from_config(config: &CircuitBreakerConfig) -> Self {
        Self::new(
            config.failure_threshold,
            Duration::from_secs(config.recovery_timeout_secs),
            config.half_open_max_calls,
            config.enabled,
        )
    }

    pub async fn try_acquire(&self) -> bool {
        if !self.enabled {
            return true;
        }
        self.inner.lock().await.try_acquire()
    }

    pub async fn record_success(&self) {
        if self.enabled {
            self.inner.lock().await.record_success();
        }
    }

    pub async fn record_failure(&self) {
        if self.enabled {
            self.inner.lock().await.record_failure();
        }
    }

    pub async fn state(&self) -> CircuitState {
        if !self.enabled {
            return CircuitState::Closed;
        }
        self.inner.lock().await.state
    }
}

/// Fails fast with `CIRCUIT_OPEN` while the breaker is open.
#[derive(Debug, Clone)]
pub struct CircuitBreakerLayer {
    breaker: CircuitBreaker,
}

impl CircuitBreakerLayer {
    pub fn new(breaker: CircuitBreaker) -> Self {
        Self { breaker }
    }

    pub fn from_config(config: &CircuitBreakerConfig) -> Self {
        Self::new(CircuitBreaker::from_config(config))
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }
}

#[async_trait]
impl<S: Service> Wrap<S> for CircuitBreakerLayer {
    fn name(&self) -> &'static str {
        "circuit_breaker"
    }

    async fn wrap(&self, data: Value, next: Next<'_, S>) -> Result<S::Output, S::Error> {
        if !self.breaker.try_acquire().await {
            debug!("circuit open, rejecting invocation");
            return Err(ServiceError::circuit_open().into());
        }
        let result = next.proceed(data).await;
        match &result {
            Ok(_) => self.breaker.record_success().await,
            Err(_) => self.breaker.record_failure().await,
        }
        result
    }
}
