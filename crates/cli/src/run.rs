//! Command execution

use std::io::{self, Write};

use checkout::prelude::{
    CartRequest, CartService, CatalogError, InMemoryCatalog, Receipt, ReceiptError, ServiceError,
};
use thiserror::Error;
use tracing::info;

use crate::config::{CliConfig, OutputFormat};

/// Errors that end a CLI invocation.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// The catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The cart command failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The receipt could not be written.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// JSON output could not be written.
    #[error("failed to write JSON output: {0}")]
    Json(#[from] serde_json::Error),

    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Message key printed in front of the error.
    pub(crate) const fn key(&self) -> &'static str {
        match self {
            Self::Catalog(_) => "CatalogError",
            Self::Service(error) => error.key(),
            Self::Receipt(_) | Self::Json(_) | Self::Io(_) => "OutputError",
        }
    }
}

/// Execute the configured command, writing results to `out`.
pub(crate) fn run(config: &CliConfig, mut out: impl Write) -> Result<(), CliError> {
    let catalog = InMemoryCatalog::from_path(&config.catalog)?;
    let service = CartService::from_catalog(catalog);
    let now = config.now();

    let Some(command) = config.command.cart_command() else {
        let placed = service.checkout(config.cart.as_deref(), config.country.as_deref(), now)?;

        info!(order_uuid = %placed.record.uuid, "order placed");

        match config.output {
            OutputFormat::Table => {
                serde_json::to_writer_pretty(&mut out, &placed.record)?;
                writeln!(out)?;
                writeln!(out, "Set-Cookie: {}", placed.cookie.header())?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(
                    &mut out,
                    &serde_json::json!({
                        "record": placed.record,
                        "cookie": placed.cookie.value(),
                    }),
                )?;
                writeln!(out)?;
            }
        }

        return Ok(());
    };

    let request = CartRequest::new(command, now)
        .with_cookie(config.cart.clone())
        .with_country(config.country.clone());

    let response = service.handle(&request)?;

    match config.output {
        OutputFormat::Table => {
            Receipt::new(&response.snapshot).write_to(&mut out)?;
            writeln!(out, "Set-Cookie: {}", response.cookie.header())?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(
                &mut out,
                &serde_json::json!({
                    "snapshot": response.snapshot,
                    "cookie": response.cookie.value(),
                }),
            )?;
            writeln!(out)?;
        }
    }

    Ok(())
}
