//! `composecheck expect` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use composecheck_core::types::format_names;
use composecheck_core::{
    Manifest, ProfileSet, ServiceSet, default_services, expected_services, unknown_profiles,
};

use crate::cli::ProfileArgs;
use crate::commands::{ProjectContext, profile_set};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `expect` command.
///
/// Computes the expected running set only; the orchestrator is never invoked.
pub async fn execute(
    args: ProfileArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let active = profile_set(args.profiles)?;
    let project = ProjectContext::load(config_path).await?;
    let report = ExpectReport::build(&project.manifest, &active);
    writer.render(&report)?;
    Ok(())
}

/// Expected running set for one profile selection.
#[derive(Serialize)]
pub struct ExpectReport {
    pub profiles: ProfileSet,
    pub expected: ServiceSet,
    pub default_services: ServiceSet,
    /// Requested profiles no service references.
    pub unknown_profiles: ProfileSet,
}

impl ExpectReport {
    pub fn build(manifest: &Manifest, active: &ProfileSet) -> Self {
        Self {
            profiles: active.clone(),
            expected: expected_services(manifest, active),
            default_services: default_services(manifest),
            unknown_profiles: unknown_profiles(manifest, active),
        }
    }
}

impl Render for ExpectReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Profiles: {}", format_names(&self.profiles).bold())?;
        writeln!(w, "  Expected: {}", self.expected.to_string().green())?;
        writeln!(w, "  Default:  {}", self.default_services)?;
        if !self.unknown_profiles.is_empty() {
            writeln!(
                w,
                "  Warning: profiles not used by any service: {}",
                format_names(&self.unknown_profiles).yellow()
            )?;
        }
        Ok(())
    }
}
