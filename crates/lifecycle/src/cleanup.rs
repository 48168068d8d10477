//! Scoped teardown guard.
//!
//! A [`CleanupGuard`] is armed before a scenario touches the orchestrator and
//! holds the "down with every profile" command. [`CleanupGuard::run`] issues
//! that command exactly once. If the guard is dropped while still armed (the
//! scenario future was cancelled or panicked), the command is spawned onto the
//! current Tokio runtime instead.
//!
//! Cleanup is best-effort: failures are logged at `warn` and returned as a
//! message, never as an error.

use std::sync::Arc;

use composecheck_core::metrics as names;
use tracing::{debug, warn};

use crate::executor::CommandExecutor;

/// Teardown guard wrapping one scenario.
pub struct CleanupGuard<E: CommandExecutor> {
    executor: Arc<E>,
    args: Option<Vec<String>>,
}

impl<E: CommandExecutor> CleanupGuard<E> {
    /// Arms a guard that will run `args` through `executor`.
    pub fn arm(executor: Arc<E>, args: Vec<String>) -> Self {
        Self {
            executor,
            args: Some(args),
        }
    }

    pub fn is_armed(&self) -> bool {
        self.args.is_some()
    }

    /// Runs the cleanup command and disarms the guard.
    ///
    /// Returns `Some(warning)` when the command failed to run or exited
    /// non-zero, `None` on success.
    pub async fn run(mut self) -> Option<String> {
        let args = self.args.take()?;
        metrics::counter!(names::COMMANDS_TOTAL, names::LABEL_OPERATION => "cleanup").increment(1);

        let warning = match self.executor.invoke(&args).await {
            Ok(output) if output.success() => {
                debug!("cleanup down completed");
                return None;
            }
            Ok(output) => format!("cleanup down failed: {}", output.describe_failure()),
            Err(e) => format!("cleanup down failed: {e}"),
        };

        metrics::counter!(names::CLEANUP_FAILURES_TOTAL).increment(1);
        warn!(warning = warning.as_str(), "best-effort cleanup did not succeed");
        Some(warning)
    }
}

impl<E: CommandExecutor> Drop for CleanupGuard<E> {
    fn drop(&mut self) {
        let Some(args) = self.args.take() else {
            return;
        };

        warn!("scenario ended without cleanup, scheduling teardown");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let executor = Arc::clone(&self.executor);
                handle.spawn(async move {
                    if let Err(e) = executor.invoke(&args).await {
                        warn!(error = %e, "deferred cleanup down failed");
                    }
                });
            }
            Err(_) => {
                warn!(
                    command = %args.join(" "),
                    "no async runtime available, cleanup skipped"
                );
            }
        }
    }
}
