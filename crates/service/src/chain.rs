//! Execution chain: wrap layers around `Service::execute`.
//!
//! Layers are kept in registration order and resolved when `proceed` is called.
//! The last registered layer is the outermost one, so for layers `L1..Ln` the
//! order is `Ln before .. L1 before, execute, L1 after .. Ln after`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::service::Service;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One layer of around-behavior.
///
/// A layer may call `next.proceed` zero times (short-circuit), once, or several times
/// (retry), may rewrite the data passed down, and may replace the result or error.
#[async_trait]
pub trait Wrap<S: Service>: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    async fn wrap(&self, data: Value, next: Next<'_, S>) -> Result<S::Output, S::Error>;
}

/// Continuation to the next-inner layer, ending at the business logic.
pub struct Next<'a, S: Service> {
    layers: &'a [Arc<dyn Wrap<S>>],
    service: &'a S,
}

impl<S: Service> Clone for Next<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Service> Copy for Next<'_, S> {}

impl<'a, S: Service> Next<'a, S> {
    pub(crate) fn new(layers: &'a [Arc<dyn Wrap<S>>], service: &'a S) -> Self {
        Self { layers, service }
    }

    pub fn proceed(&self, data: Value) -> BoxFuture<'a, Result<S::Output, S::Error>> {
        let next = *self;
        Box::pin(async move {
            match next.layers.split_last() {
                Some((outer, inner)) => outer.wrap(data, Next::new(inner, next.service)).await,
                None => next.service.execute(data).await,
            }
        })
    }

    /// Number of layers still between this point and the business logic.
    pub fn remaining(&self) -> usize {
        self.layers.len()
    }
}
