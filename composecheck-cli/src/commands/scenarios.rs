//! `composecheck scenarios` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use composecheck_core::types::format_names;
use composecheck_core::{Manifest, ProfileSet, ServiceSet, expected_services};
use composecheck_lifecycle::{Scenario, plan_scenarios};

use crate::commands::ProjectContext;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `scenarios` command.
pub async fn execute(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    let project = ProjectContext::load(config_path).await?;
    let scenarios = plan_scenarios(&project.config.scenarios, &project.manifest)?;

    let report = ScenarioList::build(
        &project.manifest,
        &scenarios,
        project.config.scenarios.is_empty(),
    );
    writer.render(&report)?;
    Ok(())
}

/// Planned scenarios with their expected sets.
#[derive(Serialize)]
pub struct ScenarioList {
    /// `true` when the list was generated from the profile matrix.
    pub generated: bool,
    pub scenarios: Vec<ScenarioEntry>,
}

#[derive(Serialize)]
pub struct ScenarioEntry {
    pub name: String,
    pub profiles: ProfileSet,
    pub expected: ServiceSet,
}

impl ScenarioList {
    pub fn build(manifest: &Manifest, scenarios: &[Scenario], generated: bool) -> Self {
        Self {
            generated,
            scenarios: scenarios
                .iter()
                .map(|scenario| ScenarioEntry {
                    name: scenario.name.clone(),
                    profiles: scenario.profiles.clone(),
                    expected: expected_services(manifest, &scenario.profiles),
                })
                .collect(),
        }
    }
}

impl Render for ScenarioList {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let origin = if self.generated {
            "generated from manifest profiles"
        } else {
            "from configuration"
        };
        writeln!(
            w,
            "{} ({} scenarios, {})",
            "Scenarios".bold(),
            self.scenarios.len(),
            origin
        )?;

        let width = self
            .scenarios
            .iter()
            .map(|s| s.name.len())
            .max()
            .unwrap_or(0);
        for entry in &self.scenarios {
            writeln!(
                w,
                "  {:<width$}  profiles {:<28}  expects {}",
                entry.name,
                format_names(&entry.profiles),
                entry.expected,
            )?;
        }
        Ok(())
    }
}
