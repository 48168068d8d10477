//! Lifecycle verifier: up, observe, compare, down, observe, compare.
//!
//! # State machine
//!
//! ```text
//! Idle ──up──▶ Upped ──observe == expected──▶ VerifiedUp
//!                                                 │
//!                                                down
//!                                                 ▼
//! Idle ◀──cleanup── VerifiedDown ◀──observe == ∅── DownRequested
//! ```
//!
//! Every failing transition halts the scenario immediately. Regardless of
//! where it halted, a single cleanup "down" with every profile the manifest
//! declares is issued before [`LifecycleVerifier::run`] returns.
//!
//! A zero exit code only gates whether observation proceeds; the running set
//! is always re-observed rather than assumed.

use std::sync::Arc;

use composecheck_core::metrics as names;
use composecheck_core::{Manifest, ProfileSet, ServiceSet, expected_services};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cleanup::CleanupGuard;
use crate::compose::{ComposeCommand, ComposeOperation, StateQuery};
use crate::config::VerifierConfig;
use crate::error::LifecycleError;
use crate::executor::CommandExecutor;

/// Last state reached by a scenario before cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing has succeeded yet.
    Idle,
    /// "up" exited zero.
    Upped,
    /// Observed running set equalled the expected set.
    VerifiedUp,
    /// "down" exited zero.
    DownRequested,
    /// Observed running set was empty after "down".
    VerifiedDown,
}

/// Result of one scenario run.
#[derive(Debug)]
pub struct ScenarioOutcome {
    /// Expected running set computed for the scenario's profiles.
    pub expected: ServiceSet,
    /// Last phase reached before cleanup.
    pub phase: Phase,
    /// `Ok` when every phase passed, otherwise the first failure.
    pub result: Result<(), LifecycleError>,
    /// Set when the post-scenario cleanup did not succeed.
    pub cleanup_warning: Option<String>,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Compares observed state after "up" with the expected set.
///
/// # Errors
///
/// `LifecycleError::ExpectationMismatch` carrying `observed − expected` as
/// `extra` and `expected − observed` as `missing`.
pub fn check_expectation(
    expected: &ServiceSet,
    observed: &ServiceSet,
) -> Result<(), LifecycleError> {
    let extra = observed.difference(expected);
    let missing = expected.difference(observed);
    if extra.is_empty() && missing.is_empty() {
        return Ok(());
    }
    Err(LifecycleError::ExpectationMismatch { extra, missing })
}

/// Requires the observed state after "down" to be empty.
pub fn check_teardown(observed: &ServiceSet) -> Result<(), LifecycleError> {
    if observed.is_empty() {
        return Ok(());
    }
    Err(LifecycleError::TeardownIncomplete {
        leftover: observed.clone(),
    })
}

/// Drives one manifest through the up/down lifecycle.
pub struct LifecycleVerifier<E: CommandExecutor> {
    executor: Arc<E>,
    compose: ComposeCommand,
    state_query: StateQuery,
}

impl<E: CommandExecutor> LifecycleVerifier<E> {
    pub fn new(executor: Arc<E>, config: &VerifierConfig) -> Self {
        Self {
            executor,
            compose: ComposeCommand::from_config(config),
            state_query: StateQuery::from_config(config),
        }
    }

    /// Runs the full scenario for `active` profiles, then cleans up.
    ///
    /// Scenarios sharing one orchestrator environment must not run
    /// concurrently; callers run them one after another.
    pub async fn run(&self, manifest: &Manifest, active: &ProfileSet) -> ScenarioOutcome {
        let expected = expected_services(manifest, active);
        info!(
            profiles = ?active,
            expected = %expected,
            "starting lifecycle scenario"
        );

        let cleanup_args = self
            .compose
            .args(ComposeOperation::Down, &manifest.all_profiles());
        let guard = CleanupGuard::arm(Arc::clone(&self.executor), cleanup_args);

        let mut phase = Phase::Idle;
        let result = self.drive(active, &expected, &mut phase).await;

        let cleanup_warning = guard.run().await;

        match &result {
            Ok(()) => info!(profiles = ?active, "lifecycle scenario passed"),
            Err(e) => warn!(
                profiles = ?active,
                phase = ?phase,
                kind = e.kind(),
                error = %e,
                "lifecycle scenario failed"
            ),
        }

        ScenarioOutcome {
            expected,
            phase,
            result,
            cleanup_warning,
        }
    }

    async fn drive(
        &self,
        active: &ProfileSet,
        expected: &ServiceSet,
        phase: &mut Phase,
    ) -> Result<(), LifecycleError> {
        self.invoke_compose(ComposeOperation::Up, active).await?;
        *phase = Phase::Upped;

        let observed = self.observe().await?;
        check_expectation(expected, &observed)?;
        *phase = Phase::VerifiedUp;

        self.invoke_compose(ComposeOperation::Down, active).await?;
        *phase = Phase::DownRequested;

        let observed = self.observe().await?;
        check_teardown(&observed)?;
        *phase = Phase::VerifiedDown;

        Ok(())
    }

    /// Invokes "up" or "down"; any non-zero exit or execution error is an
    /// `OrchestratorFailure`.
    pub async fn invoke_compose(
        &self,
        operation: ComposeOperation,
        active: &ProfileSet,
    ) -> Result<(), LifecycleError> {
        let args = self.compose.args(operation, active);
        metrics::counter!(names::COMMANDS_TOTAL, names::LABEL_OPERATION => operation.as_str())
            .increment(1);

        let output = self.executor.invoke(&args).await.map_err(|e| {
            LifecycleError::OrchestratorFailure {
                operation,
                reason: e.to_string(),
            }
        })?;

        if !output.success() {
            return Err(LifecycleError::OrchestratorFailure {
                operation,
                reason: output.describe_failure(),
            });
        }

        debug!(operation = operation.as_str(), "orchestrator invocation succeeded");
        Ok(())
    }

    /// Samples the currently running service set.
    pub async fn observe(&self) -> Result<ServiceSet, LifecycleError> {
        metrics::counter!(names::COMMANDS_TOTAL, names::LABEL_OPERATION => "ps").increment(1);

        let output = self
            .executor
            .invoke(&self.state_query.args())
            .await
            .map_err(|e| LifecycleError::StateQueryFailure {
                reason: e.to_string(),
            })?;

        if !output.success() {
            return Err(LifecycleError::StateQueryFailure {
                reason: output.describe_failure(),
            });
        }

        let observed = StateQuery::parse(&output.stdout);
        debug!(observed = %observed, "sampled running services");
        Ok(observed)
    }
}
