//! composecheck lifecycle verifier.
//!
//! # Module Structure
//!
//! - [`error`]: Domain error type (`LifecycleError`)
//! - [`config`]: Verifier configuration (`VerifierConfig`, builder)
//! - [`executor`]: External command abstraction (`CommandExecutor` trait, `ProcessExecutor`)
//! - [`compose`]: Compose and state-query argument vectors
//! - [`cleanup`]: Scoped teardown guard (`CleanupGuard`)
//! - [`verifier`]: Per-scenario state machine (`LifecycleVerifier`)
//! - [`scenario`]: Scenario planning and profile matrix
//! - [`runner`]: Sequential runner and reports (`ScenarioRunner`, `RunReport`)
//!
//! # Architecture
//!
//! ```text
//! Scenario ──▶ ScenarioRunner ──▶ LifecycleVerifier
//!                                    │  up / ps / down / ps
//!                                    ▼
//!                             CommandExecutor ──▶ compose tool, runtime
//!                                    │
//!                              CleanupGuard (down, every profile)
//! ```

pub mod cleanup;
pub mod compose;
pub mod config;
pub mod error;
pub mod executor;
pub mod runner;
pub mod scenario;
pub mod verifier;

// --- Public API Re-exports ---

// Verifier
pub use verifier::{LifecycleVerifier, Phase, ScenarioOutcome, check_expectation, check_teardown};

// Runner
pub use runner::{RunReport, ScenarioReport, ScenarioRunner};

// Scenarios
pub use scenario::{MAX_MATRIX_PROFILES, Scenario, plan_scenarios, profile_matrix};

// Configuration
pub use config::{VerifierConfig, VerifierConfigBuilder};

// Error
pub use error::LifecycleError;

// Command execution
pub use compose::{ComposeCommand, ComposeOperation, StateQuery};
pub use executor::{CommandExecutor, CommandOutput, ProcessExecutor};
