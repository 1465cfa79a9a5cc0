//! Command-line arguments for the Watchlist Client.
//!
//! This module defines the CLI interface using `clap`. Every option except
//! `--timeout-secs` and `--ephemeral` can also come from the environment.
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use watchlist_common::net::{DEFAULT_BASE_URL, DEFAULT_EXCHANGE};

use crate::market::provider::ProviderConfig;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Market-data API token.
    #[arg(long, env = "FINNHUB_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Provider base URL. Point it at a running `market_server` for offline use.
    #[arg(long, env = "WATCHLIST_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Exchange whose symbols make up the catalog.
    #[arg(long, env = "WATCHLIST_EXCHANGE", default_value = DEFAULT_EXCHANGE)]
    pub exchange: String,

    /// Directory where the watchlist is persisted.
    #[arg(long, env = "WATCHLIST_DATA_DIR", default_value = ".watchlist")]
    pub data_dir: PathBuf,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Keep the watchlist in memory only.
    #[arg(long)]
    pub ephemeral: bool,
}

impl Args {
    /// Provider settings derived from the arguments.
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            base_url: self.base_url.trim().to_string(),
            token: self.token.trim().to_string(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
        }
    }
}
