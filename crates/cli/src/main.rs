//! Checkout CLI
//!
//! Applies one cart command to a `ShoppingCart` cookie value, prints the
//! repriced cart and the cookie to send back.

use std::{io, process::ExitCode};

use crate::config::CliConfig;

mod config;
mod logging;
mod run;

fn main() -> ExitCode {
    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(error) => {
            _ = error.print();

            return if error.use_stderr() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(error) = logging::init_subscriber(&config.logging) {
        eprintln!("failed to initialise logging: {error}");

        return ExitCode::FAILURE;
    }

    match run::run(&config, io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(?error, "command failed");
            eprintln!("{}: {error}", error.key());

            ExitCode::FAILURE
        }
    }
}
