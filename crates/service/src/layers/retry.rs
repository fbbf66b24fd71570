use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use configs::RetryConfig;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::chain::{Next, Wrap};
use crate::service::Service;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base: Duration,
    backoff_max: Duration,
    enabled: bool,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_base: Duration, backoff_max: Duration, enabled: bool) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
            backoff_max,
            enabled,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.backoff_base_ms),
            Duration::from_millis(config.backoff_max_ms),
            config.enabled,
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Total attempts including the first one.
    pub fn max_attempts(&self) -> u32 {
        if self.enabled {
            self.max_attempts
        } else {
            1
        }
    }

    /// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`, capped.
    pub fn backoff(&self, attempt: u32) -> Duration {
        if !self.enabled || attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 2_u32.saturating_pow(attempt - 1);
        self.backoff_base.saturating_mul(factor).min(self.backoff_max)
    }

    pub async fn wait_before_retry(&self, attempt: u32) {
        let delay = self.backoff(attempt);
        if delay.is_zero() {
            return;
        }
        debug!(?delay, attempt, "retrying after backoff");
        sleep(delay).await;
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

type Retryable<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Re-runs the inner chain while the error is retryable and attempts remain.
///
/// Every attempt receives the same data this layer was given.
pub struct RetryLayer<S: Service> {
    policy: RetryPolicy,
    retryable: Retryable<S::Error>,
}

impl<S: Service> RetryLayer<S> {
    pub fn new<F>(policy: RetryPolicy, retryable: F) -> Self
    where
        F: Fn(&S::Error) -> bool + Send + Sync + 'static,
    {
        Self { policy, retryable: Arc::new(retryable) }
    }

    pub fn from_config<F>(config: &RetryConfig, retryable: F) -> Self
    where
        F: Fn(&S::Error) -> bool + Send + Sync + 'static,
    {
        Self::new(RetryPolicy::from_config(config), retryable)
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<S: Service> fmt::Debug for RetryLayer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryLayer").field("policy", &self.policy).finish()
    }
}

#[async_trait]
impl<S: Service> Wrap<S> for RetryLayer<S> {
    fn name(&self) -> &'static str {
        "retry"
    }

    async fn wrap(&self, data: Value, next: Next<'_, S>) -> Result<S::Output, S::Error> {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;
        loop {
            if attempt > 0 {
                self.policy.wait_before_retry(attempt).await;
            }
            match next.proceed(data.clone()).await {
                Ok(output) => {
                    if attempt > 0 {
                        debug!(retries = attempt, "execution succeeded after retries");
                    }
                    return Ok(output);
                }
                Err(err) => {
                    attempt += 1;
                    if attempt >= max_attempts || !(self.retryable)(&err) {
                        warn!(attempts = attempt, error = %err, "execution failed, not retrying");
                        return Err(err);
                    }
                    debug!(attempt, error = %err, "execution failed, will retry");
                }
            }
        }
    }
}
