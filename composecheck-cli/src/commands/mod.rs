//! Command handlers -- one module per subcommand

pub mod config;
pub mod expect;
pub mod run;
pub mod scenarios;

use std::path::Path;

use tracing::debug;

use composecheck_core::config::ComposeCheckConfig;
use composecheck_core::{Manifest, ProfileSet};
use composecheck_lifecycle::VerifierConfig;

use crate::error::CliError;

/// Everything a subcommand needs about the project under test.
pub struct ProjectContext {
    pub config: ComposeCheckConfig,
    pub verifier: VerifierConfig,
    pub manifest: Manifest,
}

impl ProjectContext {
    /// Loads the configuration and the compose manifest it points at.
    pub async fn load(config_path: &Path) -> Result<Self, CliError> {
        let config = ComposeCheckConfig::load(config_path).await?;
        let verifier = VerifierConfig::from_core(&config.orchestrator, &config.project);
        verifier.validate()?;

        let manifest = Manifest::from_compose_file(&verifier.compose_file).await?;
        debug!(
            compose_file = %verifier.compose_file.display(),
            services = manifest.len(),
            profiles = ?manifest.all_profiles(),
            "manifest loaded"
        );

        Ok(Self {
            config,
            verifier,
            manifest,
        })
    }
}

/// Collects `--profile` values, rejecting blank names.
pub(crate) fn profile_set(profiles: Vec<String>) -> Result<ProfileSet, CliError> {
    if profiles.iter().any(|p| p.trim().is_empty()) {
        return Err(CliError::Config(
            "--profile requires a non-empty profile name".to_owned(),
        ));
    }
    Ok(profiles.into_iter().collect())
}
