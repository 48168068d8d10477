//! `composecheck run` command handler

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use composecheck_core::types::format_names;
use composecheck_lifecycle::{
    LifecycleVerifier, ProcessExecutor, RunReport, Scenario, ScenarioRunner, plan_scenarios,
};

use crate::cli::ProfileArgs;
use crate::commands::{ProjectContext, profile_set};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `run` command.
///
/// With `--profile`, runs one ad-hoc scenario; otherwise the configured
/// scenarios, or the generated profile matrix when none are configured.
///
/// # Errors
///
/// Returns `CliError::ScenariosFailed` (exit code 5) after rendering the
/// report when any scenario did not pass.
pub async fn execute(
    args: ProfileArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let ad_hoc = !args.profiles.is_empty();
    let requested = profile_set(args.profiles)?;
    let project = ProjectContext::load(config_path).await?;

    let scenarios = if ad_hoc {
        vec![Scenario::for_profiles(requested)]
    } else {
        plan_scenarios(&project.config.scenarios, &project.manifest)?
    };

    info!(
        scenarios = scenarios.len(),
        compose_file = %project.verifier.compose_file.display(),
        "starting lifecycle run"
    );

    let executor = Arc::new(ProcessExecutor::new(project.verifier.command_timeout()));
    let verifier = LifecycleVerifier::new(executor, &project.verifier);
    let runner = ScenarioRunner::new(verifier, project.manifest);
    let report = runner.run_all(&scenarios).await;

    let output = RunOutput {
        source: config_path.display().to_string(),
        report,
    };
    writer.render(&output)?;

    if !output.report.all_passed() {
        return Err(CliError::ScenariosFailed {
            failed: output.report.failed_count(),
            total: output.report.scenarios.len(),
        });
    }

    Ok(())
}

/// Run report together with the configuration it came from.
#[derive(Serialize)]
pub struct RunOutput {
    pub source: String,
    #[serde(flatten)]
    pub report: RunReport,
}

impl Render for RunOutput {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Lifecycle run: {}", self.source.bold())?;

        for scenario in &self.report.scenarios {
            let status = if scenario.passed {
                "PASS".green().bold()
            } else {
                "FAIL".red().bold()
            };
            writeln!(
                w,
                "  {status} {} (profiles {}, expects {}, {} ms)",
                scenario.name,
                format_names(&scenario.profiles),
                scenario.expected,
                scenario.duration_ms
            )?;
            if let Some(ref error) = scenario.error {
                writeln!(w, "       {}", error.red())?;
                writeln!(w, "       halted at: {:?}", scenario.phase)?;
            }
            if let Some(ref warning) = scenario.cleanup_warning {
                writeln!(w, "       cleanup: {}", warning.yellow())?;
            }
        }

        writeln!(w)?;
        let summary = format!(
            "{} passed, {} failed",
            self.report.passed_count(),
            self.report.failed_count()
        );
        if self.report.all_passed() {
            writeln!(w, "Result: {}", summary.green().bold())?;
        } else {
            writeln!(w, "Result: {}", summary.red().bold())?;
        }

        Ok(())
    }
}
