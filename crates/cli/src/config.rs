//! CLI configuration

use std::path::PathBuf;

use checkout::prelude::{CartCommand, ProductId, VariantKey};
use clap::{Args, Parser, Subcommand};
use jiff::Timestamp;

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// How results are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Receipt table followed by the cookie header.
    Table,

    /// Snapshot and cookie as JSON.
    Json,
}

/// Storefront cart pricing from the command line
#[derive(Debug, Parser)]
#[command(name = "checkout-cli", about = "Storefront cart pricing", long_about = None)]
pub(crate) struct CliConfig {
    /// Catalog YAML file
    #[arg(long, env = "CHECKOUT_CATALOG")]
    pub catalog: PathBuf,

    /// Current `ShoppingCart` cookie value
    #[arg(long)]
    pub cart: Option<String>,

    /// Shipping destination country code
    #[arg(long, env = "CHECKOUT_COUNTRY")]
    pub country: Option<String>,

    /// Price the cart as of this instant instead of now
    #[arg(long)]
    pub at: Option<Timestamp>,

    /// Output format (table, json)
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Instant to price at.
    pub(crate) fn now(&self) -> Timestamp {
        self.at.unwrap_or_else(Timestamp::now)
    }
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Add units of a variant
    Add(LineArgs),

    /// Set the units of a variant
    Set(LineArgs),

    /// Remove units of a variant
    Remove(LineArgs),

    /// Apply a promo code
    ApplyCode {
        /// Promo code, case-sensitive
        code: String,
    },

    /// Remove the applied promo code
    RemoveCode {
        /// Promo code currently applied
        code: String,
    },

    /// Empty the cart
    Clear,

    /// Reprice and print the cart
    Show,

    /// Place an order for the cart
    Checkout,
}

#[derive(Debug, Args)]
pub(crate) struct LineArgs {
    /// Product id
    product: u64,

    /// Flavour name
    flavour: String,

    /// Package size in grams
    grams: u32,

    /// Number of units
    #[arg(default_value_t = 1, allow_negative_numbers = true)]
    quantity: i64,
}

impl LineArgs {
    fn key(&self) -> VariantKey {
        VariantKey::new(ProductId::new(self.product), self.flavour.as_str(), self.grams)
    }
}

impl Command {
    /// The cart command to send, `None` for checkout.
    pub(crate) fn cart_command(&self) -> Option<CartCommand> {
        let command = match self {
            Self::Add(line) => CartCommand::Add {
                key: line.key(),
                quantity: line.quantity,
            },
            Self::Set(line) => CartCommand::Set {
                key: line.key(),
                quantity: line.quantity,
            },
            Self::Remove(line) => CartCommand::Remove {
                key: line.key(),
                quantity: line.quantity,
            },
            Self::ApplyCode { code } => CartCommand::ApplyPromoCode(code.clone()),
            Self::RemoveCode { code } => CartCommand::RemovePromoCode(code.clone()),
            Self::Clear => CartCommand::Clear,
            Self::Show => CartCommand::Show,
            Self::Checkout => return None,
        };

        Some(command)
    }
}
