//! Command execution abstraction for testability.
//!
//! The [`CommandExecutor`] trait is the single seam between the verifier and the
//! outside world. Production code uses [`ProcessExecutor`], which spawns real
//! processes with `tokio::process`; tests use `MockExecutor` or a scripted fake
//! orchestrator.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐
//! │ LifecycleVerifier │
//! └─────────┬─────────┘
//!           │
//!           ▼
//!   ┌────────────────┐
//!   │CommandExecutor │ (trait)
//!   └────────────────┘
//!        │       │
//!        ▼       ▼
//!   ┌───────┐ ┌────┐
//!   │Process│ │Mock│
//!   └───┬───┘ └────┘
//!       │
//!       ▼
//!  podman-compose / podman
//! ```
//!
//! # Timeouts
//!
//! Every invocation is bounded. When the deadline passes the child process is
//! killed and `LifecycleError::CommandTimeout` is returned. There is no implicit
//! retry.

use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::LifecycleError;

/// Maximum number of stderr bytes quoted in a failure description.
const MAX_STDERR_EXCERPT: usize = 512;

/// Captured result of one external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Raw standard output.
    pub stdout: Vec<u8>,
    /// Raw standard error.
    pub stderr: Vec<u8>,
    /// Exit code, or `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// Builds a successful output carrying `stdout`.
    pub fn success_with(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: Vec::new(),
            exit_code: Some(0),
        }
    }

    /// Builds a failed output with the given exit code and stderr.
    pub fn failure(exit_code: i32, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: Vec::new(),
            stderr: stderr.into(),
            exit_code: Some(exit_code),
        }
    }

    /// Returns `true` only for exit code 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Human-readable summary of a non-zero exit: status plus a stderr excerpt.
    pub fn describe_failure(&self) -> String {
        let status = match self.exit_code {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_owned(),
        };

        let stderr = String::from_utf8_lossy(&self.stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            return status;
        }

        // Tail of stderr is where compose tools put the actual error.
        let excerpt = if stderr.len() > MAX_STDERR_EXCERPT {
            let mut start = stderr.len() - MAX_STDERR_EXCERPT;
            while !stderr.is_char_boundary(start) {
                start += 1;
            }
            format!("...{}", &stderr[start..])
        } else {
            stderr.to_owned()
        };
        format!("{status}: {excerpt}")
    }
}

/// Trait abstracting external command execution.
///
/// `invoke` takes the full argument vector (program first), runs it
/// synchronously from the caller's point of view and returns the captured
/// stdout, stderr and exit code.
///
/// # Errors
///
/// - `LifecycleError::CommandSpawn`: the program could not be started, or the
///   argument vector was empty
/// - `LifecycleError::CommandTimeout`: the program did not exit in time
///
/// A non-zero exit code is NOT an error at this layer; callers decide what a
/// failure means for their operation.
pub trait CommandExecutor: Send + Sync + 'static {
    fn invoke(
        &self,
        args: &[String],
    ) -> impl Future<Output = Result<CommandOutput, LifecycleError>> + Send;
}

/// Production executor that spawns real processes.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    timeout: Duration,
}

impl ProcessExecutor {
    /// Creates an executor that bounds every invocation by `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl CommandExecutor for ProcessExecutor {
    async fn invoke(&self, args: &[String]) -> Result<CommandOutput, LifecycleError> {
        let (program, rest) = args.split_first().ok_or_else(|| LifecycleError::CommandSpawn {
            program: String::new(),
            reason: "empty command".to_owned(),
        })?;

        debug!(command = %args.join(" "), "invoking command");

        let mut cmd = Command::new(program);
        cmd.args(rest)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| LifecycleError::CommandSpawn {
            program: program.clone(),
            reason: e.to_string(),
        })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| LifecycleError::CommandSpawn {
                program: program.clone(),
                reason: format!("failed to collect output: {e}"),
            })?,
            Err(_) => {
                warn!(
                    program = program.as_str(),
                    timeout_secs = self.timeout.as_secs(),
                    "command timed out, killing process"
                );
                return Err(LifecycleError::CommandTimeout {
                    program: program.clone(),
                    timeout_secs: self.timeout.as_secs(),
                });
            }
        };

        let output = CommandOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: output.status.code(),
        };
        debug!(
            program = program.as_str(),
            exit_code = ?output.exit_code,
            stdout_bytes = output.stdout.len(),
            "command finished"
        );
        Ok(output)
    }
}

/// Mock executor for unit tests.
///
/// Returns scripted responses in order and records every argument vector it
/// receives. Once the script is exhausted it answers with empty successes.
#[cfg(test)]
#[derive(Default)]
pub struct MockExecutor {
    responses: std::sync::Mutex<std::collections::VecDeque<Result<CommandOutput, LifecycleError>>>,
    calls: std::sync::Mutex<Vec<Vec<String>>>,
}

#[cfg(test)]
impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a scripted response.
    pub fn then(self, response: Result<CommandOutput, LifecycleError>) -> Self {
        self.responses
            .lock()
            .expect("mock lock")
            .push_back(response);
        self
    }

    /// Appends a successful response with the given stdout.
    pub fn then_ok(self, stdout: &str) -> Self {
        self.then(Ok(CommandOutput::success_with(stdout)))
    }

    /// Appends a failed response with the given exit code.
    pub fn then_exit(self, code: i32, stderr: &str) -> Self {
        self.then(Ok(CommandOutput::failure(code, stderr)))
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().expect("mock lock").clone()
    }
}

#[cfg(test)]
impl CommandExecutor for MockExecutor {
    async fn invoke(&self, args: &[String]) -> Result<CommandOutput, LifecycleError> {
        self.calls.lock().expect("mock lock").push(args.to_vec());
        self.responses
            .lock()
            .expect("mock lock")
            .pop_front()
            .unwrap_or_else(|| Ok(CommandOutput::success_with("")))
    }
}
