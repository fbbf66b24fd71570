//! Per-invocation context and state machine.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::trace;
use uuid::Uuid;

/// Where an invocation is in the phase sequence.
///
/// ```text
/// Created → Validating → (ValidationFailed | Validated) → CheckingPermissions
///         → (Denied | Authorized) → Executing → (ExecutionFailed | Completed)
/// ```
///
/// `Misconfigured` is reached from `Validating` when the rule set cannot be compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationState {
    Created,
    Validating,
    ValidationFailed,
    Validated,
    CheckingPermissions,
    Denied,
    Authorized,
    Executing,
    ExecutionFailed,
    Completed,
    Misconfigured,
}

impl InvocationState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::ValidationFailed | Self::Denied | Self::ExecutionFailed | Self::Completed | Self::Misconfigured
        )
    }

    pub fn is_failure(self) -> bool {
        self.is_terminal() && self != Self::Completed
    }

    pub fn can_advance_to(self, next: InvocationState) -> bool {
        use InvocationState::*;
        matches!(
            (self, next),
            (Created, Validating)
                | (Validating, ValidationFailed | Validated | Misconfigured)
                | (Validated, CheckingPermissions)
                | (CheckingPermissions, Denied | Authorized)
                | (Authorized, Executing)
                | (Executing, ExecutionFailed | Completed)
        )
    }
}

/// Snapshot handed to lifecycle hooks.
#[derive(Debug, Clone, Serialize)]
pub struct RunContext {
    invocation_id: Uuid,
    service: &'static str,
    input_data: Option<Value>,
    clean_data: Option<Value>,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    execution_time_ms: Option<u64>,
    state: InvocationState,
    #[serde(skip)]
    started: Instant,
}

impl RunContext {
    pub(crate) fn start(service: &'static str, input_data: Option<Value>) -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
            service,
            input_data,
            clean_data: None,
            start_time: Utc::now(),
            end_time: None,
            execution_time_ms: None,
            state: InvocationState::Created,
            started: Instant::now(),
        }
    }

    pub fn invocation_id(&self) -> Uuid {
        self.invocation_id
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    /// Raw input as passed to `run`; `None` when nothing was passed.
    pub fn input_data(&self) -> Option<&Value> {
        self.input_data.as_ref()
    }

    /// Set once validation succeeds.
    pub fn clean_data(&self) -> Option<&Value> {
        self.clean_data.as_ref()
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Only set when the execution chain completed without error.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn execution_time_ms(&self) -> Option<u64> {
        self.execution_time_ms
    }

    pub fn state(&self) -> InvocationState {
        self.state
    }

    /// Time since `run` was entered. Usable from `on_error`, where no end time is recorded.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn elapsed_ms(&self) -> u64 {
        saturating_millis(self.elapsed())
    }

    pub(crate) fn advance(&mut self, next: InvocationState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal invocation transition {:?} -> {:?}",
            self.state,
            next
        );
        trace!(invocation_id = %self.invocation_id, from = ?self.state, to = ?next, "state transition");
        self.state = next;
    }

    pub(crate) fn set_clean_data(&mut self, clean: Value) {
        debug_assert!(self.clean_data.is_none(), "clean data set twice");
        self.clean_data = Some(clean);
    }

    pub(crate) fn complete(&mut self) {
        let elapsed = self.started.elapsed();
        self.end_time = Some(Utc::now());
        self.execution_time_ms = Some(saturating_millis(elapsed));
        self.advance(InvocationState::Completed);
    }
}

/// Whole milliseconds, clamped to `u64::MAX`.
pub(crate) fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
