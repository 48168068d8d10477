//! `composecheck config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use composecheck_core::config::{ComposeCheckConfig, ScenarioConfig};
use composecheck_lifecycle::plan_scenarios;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::commands::ProjectContext;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Execute the config validate subcommand.
///
/// Loads and validates the configuration file, reporting any errors.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails (missing file, invalid values,
/// parse errors, unreadable manifest, declared expectations that disagree with it).
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let errors = validation_errors(config_path).await;
    let report = ConfigValidationReport {
        source: config_path.display().to_string(),
        valid: errors.is_empty(),
        errors,
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Loads the configuration, the manifest it names and the planned scenarios.
///
/// Declared `expected` sets are checked against the manifest.
async fn validation_errors(config_path: &Path) -> Vec<String> {
    let project = match ProjectContext::load(config_path).await {
        Ok(project) => project,
        Err(e) => return vec![e.to_string()],
    };

    match plan_scenarios(&project.config.scenarios, &project.manifest) {
        Ok(scenarios) => {
            debug!(scenarios = scenarios.len(), "scenarios planned");
            Vec::new()
        }
        Err(e) => vec![e.to_string()],
    }
}

/// Execute the config show subcommand.
///
/// Displays the effective configuration (file + env overrides + defaults),
/// optionally restricted to one section.
///
/// # Errors
///
/// Returns `CliError::Core` if loading fails or `CliError::Command` if the section name is invalid.
async fn execute_show(
    config_path: &Path,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let config = ComposeCheckConfig::load(config_path).await?;
    let report = ConfigReport {
        source: config_path.display().to_string(),
        config_toml: render_section(&config, section.as_deref())?,
        section,
    };

    writer.render(&report)?;

    Ok(())
}

/// Serializes the whole configuration or one named section as TOML.
fn render_section(config: &ComposeCheckConfig, section: Option<&str>) -> Result<String, CliError> {
    // A bare array cannot be a TOML document, so scenarios keep their table key.
    #[derive(Serialize)]
    struct Scenarios<'a> {
        scenarios: &'a [ScenarioConfig],
    }

    let rendered = match section {
        None => toml::to_string_pretty(config),
        Some("general") => toml::to_string_pretty(&config.general),
        Some("orchestrator") => toml::to_string_pretty(&config.orchestrator),
        Some("project") => toml::to_string_pretty(&config.project),
        Some("scenarios") => toml::to_string_pretty(&Scenarios {
            scenarios: &config.scenarios,
        }),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {} (expected: general, orchestrator, project, scenarios)",
                other
            )));
        }
    };

    Ok(rendered.unwrap_or_else(|e| format!("(serialization error: {})", e)))
}

/// Configuration display report.
///
/// The `config_toml` field is skipped during JSON serialization (only used for text rendering).
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration file path
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Serialized TOML configuration
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration file path
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> ComposeCheckConfig {
        ComposeCheckConfig::parse(
            r#"
[orchestrator]
compose_command = ["python3", "podman_compose.py"]

[[scenarios]]
name = "profile-1"
profiles = ["profile-1"]
"#,
        )
        .expect("sample config should parse")
    }

    #[test]
    fn test_render_full_config() {
        let toml = render_section(&sample_config(), None).expect("render");
        assert!(toml.contains("[general]"));
        assert!(toml.contains("podman_compose.py"));
        assert!(toml.contains("[[scenarios]]"));
    }

    #[test]
    fn test_render_single_section() {
        let toml = render_section(&sample_config(), Some("orchestrator")).expect("render");
        assert!(toml.contains("runtime_binary"));
        assert!(!toml.contains("log_level"));
    }

    #[test]
    fn test_render_scenarios_section() {
        let toml = render_section(&sample_config(), Some("scenarios")).expect("render");
        assert!(toml.contains("[[scenarios]]"));
        assert!(toml.contains("profile-1"));
    }

    #[test]
    fn test_render_unknown_section() {
        let err = render_section(&sample_config(), Some("ebpf")).expect_err("unknown section");
        assert!(err.to_string().contains("unknown section: ebpf"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_config_report_render_text_specific_section() {
        let report = ConfigReport {
            source: "/etc/composecheck.toml".to_owned(),
            section: Some("project".to_owned()),
            config_toml: "compose_file = \"docker-compose.yml\"".to_owned(),
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("[project]"), "should show section name");
        assert!(output.contains("compose_file"), "should show config content");
    }

    #[test]
    fn test_config_report_json_skips_toml() {
        let report = ConfigReport {
            source: "test.toml".to_owned(),
            section: Some("general".to_owned()),
            config_toml: "log_level = \"info\"".to_owned(),
        };

        let parsed = serde_json::to_value(&report).expect("JSON serialization should succeed");
        assert_eq!(parsed["source"].as_str(), Some("test.toml"));
        assert_eq!(parsed["section"].as_str(), Some("general"));
        assert!(parsed.get("config_toml").is_none());
    }

    #[test]
    fn test_config_validation_report_invalid_text() {
        let report = ConfigValidationReport {
            source: "bad.toml".to_owned(),
            valid: false,
            errors: vec!["invalid config value for 'general.log_format'".to_owned()],
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("INVALID"));
        assert!(output.contains("general.log_format"));
    }
}
