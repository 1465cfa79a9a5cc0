//! Command-line arguments for the sandbox provider.
use clap::Parser;
use watchlist_common::net::SANDBOX_PORT;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// TCP port to listen on.
    #[arg(long, default_value_t = SANDBOX_PORT)]
    pub port: u16,

    /// Token clients must send; any token is accepted when omitted.
    #[arg(long, env = "MARKET_SERVER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Milliseconds between price steps.
    #[arg(long, default_value_t = 500)]
    pub tick_ms: u64,
}
