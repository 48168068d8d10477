//! CLI-specific error types and exit code mapping

use composecheck_core::error::ComposeCheckError;
use composecheck_lifecycle::LifecycleError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// At least one lifecycle scenario did not pass.
    #[error("{failed} of {total} scenarios failed")]
    ScenariosFailed { failed: usize, total: usize },

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from composecheck-core.
    #[error("{0}")]
    Core(#[from] ComposeCheckError),

    /// Wrapped domain error from composecheck-lifecycle.
    #[error("{0}")]
    Lifecycle(#[from] LifecycleError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                               |
    /// |------|---------------------------------------|
    /// | 0    | Success                               |
    /// | 1    | General / command error               |
    /// | 2    | Configuration or manifest error       |
    /// | 5    | One or more scenarios failed          |
    /// | 10   | IO error                              |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Core(ComposeCheckError::Config(_) | ComposeCheckError::Manifest(_)) => 2,
            Self::Lifecycle(LifecycleError::Config { .. }) => 2,
            Self::ScenariosFailed { .. } => 5,
            Self::Io(_) | Self::Core(ComposeCheckError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Lifecycle(_) => 1,
        }
    }
}
