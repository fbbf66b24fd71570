use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::chain::{Next, Wrap};
use crate::service::Service;

/// A resource opened around the inner chain, such as a transaction or a lock lease.
#[async_trait]
pub trait ResourceScope<E>: Send + Sync {
    type Guard: Send;

    async fn acquire(&self) -> Result<Self::Guard, E>;

    async fn commit(&self, guard: Self::Guard) -> Result<(), E>;

    /// Must not fail; problems are the implementor's to log.
    async fn rollback(&self, guard: Self::Guard);
}

/// Commits the scope when the inner chain succeeds and rolls it back when it fails.
///
/// A failing `commit` becomes the invocation's error. If `acquire` fails the inner
/// chain is not run.
pub struct ScopeLayer<R> {
    scope: R,
}

impl<R> ScopeLayer<R> {
    pub fn new(scope: R) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> &R {
        &self.scope
    }
}

#[async_trait]
impl<S, R> Wrap<S> for ScopeLayer<R>
where
    S: Service,
    R: ResourceScope<S::Error> + 'static,
{
    fn name(&self) -> &'static str {
        "scope"
    }

    async fn wrap(&self, data: Value, next: Next<'_, S>) -> Result<S::Output, S::Error> {
        let guard = self.scope.acquire().await?;
        match next.proceed(data).await {
            Ok(output) => {
                self.scope.commit(guard).await?;
                debug!("scope committed");
                Ok(output)
            }
            Err(err) => {
                warn!(error = %err, "rolling back scope");
                self.scope.rollback(guard).await;
                Err(err)
            }
        }
    }
}
