//! Basket Sync CLI
//!
//! Headless host for the cart quantity synchroniser: sends quantity changes
//! to a shop's basket endpoint and prints the cart the server renders.

use std::process::ExitCode;

use tracing::error;

use crate::{
    config::{CliConfig, Command},
    errors::{CliError, error_chain},
};

mod commands;
mod config;
mod errors;
mod observability;

/// Basket Sync CLI entry point
#[tokio::main]
pub async fn main() -> ExitCode {
    // Load configuration from .env and CLI arguments
    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(error) => error.exit(),
    };

    if let Err(init_error) = observability::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for init errors"
        )]
        {
            eprintln!("{init_error}");
        }

        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(run_error) => {
            error!(error = %error_chain(&run_error), "command failed");

            #[expect(clippy::print_stderr, reason = "failures are reported to the user")]
            {
                eprintln!("error: {}", error_chain(&run_error));
            }

            ExitCode::FAILURE
        }
    }
}

async fn run(config: CliConfig) -> Result<(), CliError> {
    let client = config.client.client_config();

    match config.command {
        Command::Change(args) => commands::change::run(args, &client).await,
        Command::Replay(args) => commands::replay::run(args, &client).await,
    }
}
