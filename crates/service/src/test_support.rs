#![cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use crate::chain::{Next, Wrap};
use crate::context::RunContext;
use crate::errors::{ConfigurationError, ServiceError};
use crate::service::Service;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Config(#[from] ConfigurationError),
    #[error("business failure: {0}")]
    Business(String),
    #[error("transient failure: {0}")]
    Transient(String),
}

impl AppError {
    pub fn code(&self) -> Option<&str> {
        match self {
            AppError::Service(err) => Some(err.code()),
            _ => None,
        }
    }
}

/// Shared record of what a test service saw.
#[derive(Default)]
pub struct Recorder {
    pub events: Mutex<Vec<String>>,
    pub permission_inputs: Mutex<Vec<Value>>,
    pub executions: AtomicUsize,
    pub successes: Mutex<Vec<RunContext>>,
    pub errors: Mutex<Vec<(String, RunContext)>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

pub enum Mode {
    Echo,
    Fail,
    FailTimes(AtomicUsize),
}

/// Requires `name` as a non-empty string; echoes clean data back.
pub struct CreateUser {
    pub recorder: Arc<Recorder>,
    pub deny: bool,
    pub mode: Mode,
}

impl CreateUser {
    pub fn new(recorder: &Arc<Recorder>) -> Self {
        Self { recorder: Arc::clone(recorder), deny: false, mode: Mode::Echo }
    }

    pub fn denying(recorder: &Arc<Recorder>) -> Self {
        Self { deny: true, ..Self::new(recorder) }
    }

    pub fn failing(recorder: &Arc<Recorder>) -> Self {
        Self { mode: Mode::Fail, ..Self::new(recorder) }
    }

    pub fn failing_times(recorder: &Arc<Recorder>, times: usize) -> Self {
        Self { mode: Mode::FailTimes(AtomicUsize::new(times)), ..Self::new(recorder) }
    }
}

#[async_trait]
impl Service for CreateUser {
    type Output = Value;
    type Error = AppError;

    fn validation_rules() -> Option<Value> {
        Some(json!({
            "name": ["required", "not_empty", "string"],
            "age": "positive_integer",
        }))
    }

    async fn check_permissions(&self, clean: &Value) -> Result<(), AppError> {
        self.recorder.permission_inputs.lock().unwrap().push(clean.clone());
        if self.deny {
            return Err(ServiceError::permission_denied().into());
        }
        Ok(())
    }

    async fn execute(&self, clean: Value) -> Result<Value, AppError> {
        self.recorder.executions.fetch_add(1, Ordering::SeqCst);
        self.recorder.push("exec");
        match &self.mode {
            Mode::Echo => Ok(clean),
            Mode::Fail => Err(AppError::Business("boom".into())),
            Mode::FailTimes(left) => {
                let remaining = left.load(Ordering::SeqCst);
                if remaining > 0 {
                    left.store(remaining - 1, Ordering::SeqCst);
                    Err(AppError::Transient("try again".into()))
                } else {
                    Ok(clean)
                }
            }
        }
    }

    async fn on_success(&self, _output: &Value, ctx: &RunContext) -> Result<(), AppError> {
        self.recorder.successes.lock().unwrap().push(ctx.clone());
        Ok(())
    }

    async fn on_error(&self, error: &AppError, ctx: &RunContext) -> Result<(), AppError> {
        self.recorder.errors.lock().unwrap().push((error.to_string(), ctx.clone()));
        Ok(())
    }
}

/// Service without rules; returns whatever clean data it got.
pub struct Passthrough;

#[async_trait]
impl Service for Passthrough {
    type Output = Value;
    type Error = AppError;

    async fn check_permissions(&self, _clean: &Value) -> Result<(), AppError> {
        Ok(())
    }

    async fn execute(&self, clean: Value) -> Result<Value, AppError> {
        Ok(clean)
    }
}

/// Records `<label>-before` / `<label>-after` around the rest of the chain.
pub struct Marker {
    pub label: String,
    pub recorder: Arc<Recorder>,
}

impl Marker {
    pub fn new(label: impl Into<String>, recorder: &Arc<Recorder>) -> Self {
        Self { label: label.into(), recorder: Arc::clone(recorder) }
    }
}

#[async_trait]
impl<S: Service> Wrap<S> for Marker {
    async fn wrap(&self, data: Value, next: Next<'_, S>) -> Result<S::Output, S::Error> {
        self.recorder.push(format!("{}-before", self.label));
        let result = next.proceed(data).await;
        self.recorder.push(format!("{}-after", self.label));
        result
    }
}
