//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// composecheck -- verify that compose profiles gate services across up/down.
///
/// Use `composecheck <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "composecheck", version, about, long_about = None)]
pub struct Cli {
    /// Path to the composecheck.toml configuration file.
    #[arg(short, long, global = true, default_value = "composecheck.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run lifecycle scenarios against the real orchestrator.
    Run(ProfileArgs),

    /// Print the services expected for a profile set (no orchestrator calls).
    Expect(ProfileArgs),

    /// List the scenarios `run` would execute.
    Scenarios,

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- run / expect ----

/// Profile selection shared by `run` and `expect`.
#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Activate a profile (repeatable). For `run`, replaces the configured
    /// scenarios with one ad-hoc scenario.
    #[arg(short, long = "profile", value_name = "PROFILE")]
    pub profiles: Vec<String>,
}

// ---- config ----

/// Manage composecheck configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, orchestrator, project, scenarios).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parse_run_without_profiles() {
        let cli = Cli::try_parse_from(["composecheck", "run"]).expect("parse succeeded");
        match cli.command {
            Commands::Run(args) => assert!(args.profiles.is_empty()),
            _ => panic!("expected Run command"),
        }
        assert_eq!(cli.config, PathBuf::from("composecheck.toml"));
    }

    #[test]
    fn test_cli_parse_run_with_repeated_profiles() {
        let cli = Cli::try_parse_from([
            "composecheck",
            "run",
            "--profile",
            "profile-1",
            "-p",
            "profile-2",
        ])
        .expect("parse succeeded");
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.profiles, vec!["profile-1", "profile-2"]);
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_expect() {
        let cli = Cli::try_parse_from(["composecheck", "expect", "--profile", "profile-1"])
            .expect("parse succeeded");
        assert!(matches!(cli.command, Commands::Expect(ref a) if a.profiles == ["profile-1"]));
    }

    #[test]
    fn test_cli_parse_scenarios() {
        let cli = Cli::try_parse_from(["composecheck", "scenarios"]).expect("parse succeeded");
        assert!(matches!(cli.command, Commands::Scenarios));
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let cli = Cli::try_parse_from(["composecheck", "config", "show", "--section", "project"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Config(ConfigArgs {
                action: ConfigAction::Show { section },
            }) => assert_eq!(section.as_deref(), Some("project")),
            _ => panic!("expected Config Show command"),
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "composecheck",
            "scenarios",
            "--output",
            "json",
            "--config",
            "/etc/composecheck.toml",
            "--log-level",
            "debug",
        ])
        .expect("parse succeeded");
        assert!(matches!(cli.output, OutputFormat::Json));
        assert_eq!(cli.config, PathBuf::from("/etc/composecheck.toml"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_cli_rejects_unknown_output_format() {
        let result = Cli::try_parse_from(["composecheck", "--output", "yaml", "scenarios"]);
        assert!(result.is_err(), "yaml is not a supported output format");
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["composecheck"]).is_err());
    }
}
