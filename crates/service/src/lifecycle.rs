//! Lifecycle hooks: exactly one of `on_success` / `on_error` per invocation.

use tracing::{info, warn};

use crate::context::RunContext;
use crate::service::Service;

/// Dispatch the hook for a resolved invocation and hand back what the caller should see.
///
/// A failing `on_success` turns the invocation into that error; `on_error` is not called
/// afterwards. A failing `on_error` replaces the original error, which is logged.
pub(crate) async fn notify<S: Service>(
    service: &S,
    outcome: Result<S::Output, S::Error>,
    ctx: &RunContext,
) -> Result<S::Output, S::Error> {
    match outcome {
        Ok(output) => match service.on_success(&output, ctx).await {
            Ok(()) => {
                info!(
                    event = "invocation_completed",
                    execution_time_ms = ctx.execution_time_ms(),
                    "service invocation completed"
                );
                Ok(output)
            }
            Err(hook_err) => {
                warn!(event = "on_success_failed", error = %hook_err, "on_success hook failed");
                Err(hook_err)
            }
        },
        Err(err) => {
            info!(
                event = "invocation_failed",
                state = ?ctx.state(),
                elapsed_ms = ctx.elapsed_ms(),
                error = %err,
                "service invocation failed"
            );
            match service.on_error(&err, ctx).await {
                Ok(()) => Err(err),
                Err(hook_err) => {
                    warn!(
                        event = "on_error_failed",
                        original = %err,
                        error = %hook_err,
                        "on_error hook failed; its error replaces the original"
                    );
                    Err(hook_err)
                }
            }
        }
    }
}
