//! Orchestrator command construction and state-query parsing.
//!
//! Builds the argument vectors for the three external operations:
//!
//! ```text
//! up:    <compose_command...> --env-file <env> [--profile <p>]... -f <compose> up -d
//! down:  <compose_command...> --env-file <env> [--profile <p>]... -f <compose> down
//! state: <runtime> container ps --format {{index .Labels "<label>"}}
//! ```

use std::fmt;
use std::path::Path;

use composecheck_core::{ProfileSet, ServiceSet};
use serde::Serialize;

use crate::config::VerifierConfig;

/// Orchestrator lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComposeOperation {
    /// Create and start services detached (`up -d`).
    Up,
    /// Stop and remove services (`down`).
    Down,
}

impl ComposeOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    /// Trailing arguments for this operation.
    fn trailing_args(&self) -> &'static [&'static str] {
        match self {
            Self::Up => &["up", "-d"],
            Self::Down => &["down"],
        }
    }
}

impl fmt::Display for ComposeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder for compose-tool argument vectors.
#[derive(Debug, Clone)]
pub struct ComposeCommand {
    compose_command: Vec<String>,
    env_file: String,
    compose_file: String,
}

impl ComposeCommand {
    pub fn from_config(config: &VerifierConfig) -> Self {
        Self {
            compose_command: config.compose_command.clone(),
            env_file: path_arg(&config.env_file),
            compose_file: path_arg(&config.compose_file),
        }
    }

    /// Shared prefix: program, env file, one `--profile` pair per profile, manifest.
    ///
    /// Profiles are emitted in sorted order so the same set always produces the
    /// same command line.
    pub fn base_args(&self, profiles: &ProfileSet) -> Vec<String> {
        let mut args = self.compose_command.clone();
        args.push("--env-file".to_owned());
        args.push(self.env_file.clone());
        for profile in profiles {
            args.push("--profile".to_owned());
            args.push(profile.clone());
        }
        args.push("-f".to_owned());
        args.push(self.compose_file.clone());
        args
    }

    /// Full argument vector for `operation` with `profiles` active.
    pub fn args(&self, operation: ComposeOperation, profiles: &ProfileSet) -> Vec<String> {
        let mut args = self.base_args(profiles);
        args.extend(operation.trailing_args().iter().map(|s| (*s).to_owned()));
        args
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Running-service query against the container runtime.
#[derive(Debug, Clone)]
pub struct StateQuery {
    runtime_binary: String,
    service_label: String,
}

impl StateQuery {
    pub fn from_config(config: &VerifierConfig) -> Self {
        Self {
            runtime_binary: config.runtime_binary.clone(),
            service_label: config.service_label.clone(),
        }
    }

    /// Go template printing the service label of each running container.
    pub fn format_template(&self) -> String {
        format!("{{{{index .Labels \"{}\"}}}}", self.service_label)
    }

    pub fn args(&self) -> Vec<String> {
        vec![
            self.runtime_binary.clone(),
            "container".to_owned(),
            "ps".to_owned(),
            "--format".to_owned(),
            self.format_template(),
        ]
    }

    /// Parses query stdout (one service name per line) into a set.
    ///
    /// Containers without the label print an empty line; those are dropped
    /// together with duplicates from scaled services.
    pub fn parse(stdout: &[u8]) -> ServiceSet {
        ServiceSet::from_lines(&String::from_utf8_lossy(stdout))
    }
}
