//! composecheck command-line entry point.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;

use composecheck_core::config::{ComposeCheckConfig, GeneralConfig};

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // The file may be invalid; `config validate` reports that itself.
    let mut general = ComposeCheckConfig::load(&cli.config)
        .await
        .map(|config| config.general)
        .unwrap_or_else(|_| GeneralConfig::default());
    if let Some(level) = cli.log_level.clone() {
        general.log_level = level;
    }

    if let Err(e) = logging::init_tracing(&general) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    // No-op until a metrics recorder is installed.
    composecheck_core::metrics::describe_all();

    tracing::debug!(config = %cli.config.display(), "composecheck starting");

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Run(args) => commands::run::execute(args, &cli.config, &writer).await,
        Commands::Expect(args) => commands::expect::execute(args, &cli.config, &writer).await,
        Commands::Scenarios => commands::scenarios::execute(&cli.config, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}
