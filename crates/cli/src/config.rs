//! CLI configuration module

use std::time::Duration;

use basket_sync::config::{ApplyPolicy, ClientConfig};
use clap::{Args, Parser, Subcommand};
use url::Url;

/// Basket Sync CLI configuration
#[derive(Debug, Parser)]
#[command(name = "basket-sync", about = "Basket quantity sync client", long_about = None)]
pub(crate) struct CliConfig {
    /// Basket server settings.
    #[command(flatten)]
    pub client: ClientArgs,

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
}

/// Basket server settings.
#[derive(Debug, Args)]
pub(crate) struct ClientArgs {
    /// Root URL of the shop, e.g. `http://127.0.0.1:8000/`
    #[arg(long, env = "BASKET_BASE_URL")]
    pub base_url: Url,

    /// Request timeout in seconds; waits indefinitely when omitted
    #[arg(long, env = "BASKET_TIMEOUT_SECONDS")]
    pub timeout_seconds: Option<u64>,

    /// How overlapping responses are applied (arrival-order, latest-edit)
    #[arg(
        long,
        env = "BASKET_APPLY_POLICY",
        value_enum,
        default_value_t = ApplyPolicyArg::ArrivalOrder
    )]
    pub apply_policy: ApplyPolicyArg,
}

impl ClientArgs {
    pub(crate) fn client_config(&self) -> ClientConfig {
        let config =
            ClientConfig::new(self.base_url.clone()).with_apply_policy(self.apply_policy.into());

        match self.timeout_seconds {
            Some(seconds) => config.with_timeout(Duration::from_secs(seconds)),
            None => config,
        }
    }
}

/// Response ordering policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum ApplyPolicyArg {
    /// Apply responses as they arrive.
    ArrivalOrder,

    /// Drop responses to edits older than the last applied one.
    LatestEdit,
}

impl From<ApplyPolicyArg> for ApplyPolicy {
    fn from(value: ApplyPolicyArg) -> Self {
        match value {
            ApplyPolicyArg::ArrivalOrder => Self::ArrivalOrder,
            ApplyPolicyArg::LatestEdit => Self::LatestEdit,
        }
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
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

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Send one quantity change and print the rendered cart
    Change(ChangeArgs),

    /// Read `NAME VALUE [TYPE]` lines from stdin and replay them as change
    /// events against a mounted cart view
    Replay(ReplayArgs),
}

#[derive(Debug, Args)]
pub(crate) struct ChangeArgs {
    /// Cart line identifier (the quantity input's `name`)
    #[arg(long)]
    pub item: String,

    /// New quantity, as typed into the input
    #[arg(long)]
    pub quantity: String,
}

#[derive(Debug, Args)]
pub(crate) struct ReplayArgs {
    /// Cart markup shown before the first update
    #[arg(long, default_value = "")]
    pub initial: String,
}
