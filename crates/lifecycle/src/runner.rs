//! Sequential scenario runner and reports.
//!
//! Scenarios share one orchestrator environment, so they run strictly one
//! after another. A failing scenario does not stop the run.

use std::time::Instant;

use composecheck_core::metrics as names;
use composecheck_core::{Manifest, ServiceSet, unknown_profiles};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::executor::CommandExecutor;
use crate::scenario::Scenario;
use crate::verifier::{LifecycleVerifier, Phase};

/// Report for one executed scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub run_id: Uuid,
    pub name: String,
    pub profiles: Vec<String>,
    pub expected: ServiceSet,
    pub phase: Phase,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup_warning: Option<String>,
    pub duration_ms: u64,
}

/// Aggregate report for a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub scenarios: Vec<ScenarioReport>,
}

impl RunReport {
    pub fn passed_count(&self) -> usize {
        self.scenarios.iter().filter(|s| s.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.scenarios.len() - self.passed_count()
    }

    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }
}

/// Runs scenarios against one manifest.
pub struct ScenarioRunner<E: CommandExecutor> {
    verifier: LifecycleVerifier<E>,
    manifest: Manifest,
}

impl<E: CommandExecutor> ScenarioRunner<E> {
    pub fn new(verifier: LifecycleVerifier<E>, manifest: Manifest) -> Self {
        Self { verifier, manifest }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Runs one scenario including its cleanup.
    pub async fn run_one(&self, scenario: &Scenario) -> ScenarioReport {
        let run_id = Uuid::new_v4();

        let unknown = unknown_profiles(&self.manifest, &scenario.profiles);
        if !unknown.is_empty() {
            warn!(
                scenario = scenario.name.as_str(),
                unknown = ?unknown,
                "profiles not referenced by any service; they gate nothing"
            );
        }

        info!(%run_id, scenario = scenario.name.as_str(), "running scenario");
        let started = Instant::now();
        let outcome = self.verifier.run(&self.manifest, &scenario.profiles).await;
        let elapsed = started.elapsed();

        let passed = outcome.passed();
        metrics::counter!(
            names::SCENARIOS_TOTAL,
            names::LABEL_RESULT => if passed { "pass" } else { "fail" }
        )
        .increment(1);
        metrics::histogram!(names::SCENARIO_DURATION_SECONDS).record(elapsed.as_secs_f64());

        let (error_kind, error) = match &outcome.result {
            Ok(()) => (None, None),
            Err(e) => (Some(e.kind().to_owned()), Some(e.to_string())),
        };

        ScenarioReport {
            run_id,
            name: scenario.name.clone(),
            profiles: scenario.profiles.iter().cloned().collect(),
            expected: outcome.expected,
            phase: outcome.phase,
            passed,
            error_kind,
            error,
            cleanup_warning: outcome.cleanup_warning,
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Runs every scenario in order.
    pub async fn run_all(&self, scenarios: &[Scenario]) -> RunReport {
        let mut report = RunReport::default();
        for scenario in scenarios {
            report.scenarios.push(self.run_one(scenario).await);
        }

        info!(
            total = report.scenarios.len(),
            passed = report.passed_count(),
            failed = report.failed_count(),
            "run finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::VerifierConfig;
    use crate::executor::MockExecutor;
    use composecheck_core::{ProfileSet, Service};

    fn runner(executor: &Arc<MockExecutor>) -> ScenarioRunner<MockExecutor> {
        let manifest = Manifest::from_services([
            Service::new("default-service"),
            Service::new("service-1").with_profile("profile-1"),
        ]);
        let verifier = LifecycleVerifier::new(Arc::clone(executor), &VerifierConfig::default());
        ScenarioRunner::new(verifier, manifest)
    }

    #[tokio::test]
    async fn passing_scenario_report() {
        let executor = Arc::new(
            MockExecutor::new()
                .then_ok("")
                .then_ok("default-service\n")
                .then_ok("")
                .then_ok(""),
        );
        let report = runner(&executor)
            .run_one(&Scenario::for_profiles(ProfileSet::new()))
            .await;
        assert!(report.passed);
        assert_eq!(report.phase, Phase::VerifiedDown);
        assert!(report.error.is_none());
        assert_eq!(report.expected, ServiceSet::from_iter(["default-service"]));
    }

    #[tokio::test]
    async fn failing_scenario_report_carries_kind_and_message() {
        let executor = Arc::new(MockExecutor::new().then_ok("").then_ok(""));
        let report = runner(&executor)
            .run_one(&Scenario::for_profiles(ProfileSet::new()))
            .await;
        assert!(!report.passed);
        assert_eq!(report.error_kind.as_deref(), Some("expectation_mismatch"));
        assert!(
            report
                .error
                .as_deref()
                .unwrap_or_default()
                .contains("{default-service}")
        );
    }

    #[tokio::test]
    async fn run_all_continues_after_failure() {
        let executor = Arc::new(
            MockExecutor::new()
                // scenario 1: up fails, cleanup
                .then_exit(1, "")
                .then_ok("")
                // scenario 2: passes
                .then_ok("")
                .then_ok("default-service\n")
                .then_ok("")
                .then_ok("")
                .then_ok(""),
        );
        let scenarios = vec![
            Scenario::for_profiles(ProfileSet::new()),
            Scenario::for_profiles(ProfileSet::new()),
        ];
        let report = runner(&executor).run_all(&scenarios).await;
        assert_eq!(report.scenarios.len(), 2);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.passed_count(), 1);
        assert!(!report.all_passed());
        assert_ne!(report.scenarios[0].run_id, report.scenarios[1].run_id);
    }

    #[test]
    fn report_serializes_phase_in_snake_case() {
        let report = ScenarioReport {
            run_id: Uuid::nil(),
            name: "n".to_owned(),
            profiles: Vec::new(),
            expected: ServiceSet::new(),
            phase: Phase::DownRequested,
            passed: false,
            error_kind: None,
            error: None,
            cleanup_warning: None,
            duration_ms: 0,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["phase"], "down_requested");
        assert!(json.get("error").is_none());
    }
}
