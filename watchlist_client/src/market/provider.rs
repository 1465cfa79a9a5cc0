//! Remote market-data queries.
//!
//! `MarketDataProvider` is the blocking, thread-safe seam the dispatcher calls from
//! worker threads. `FinnhubProvider` implements it over HTTPS with `reqwest`:
//! - `GET {base}/stock/symbol?exchange=..&token=..` → `Vec<Symbol>`
//! - `GET {base}/quote?symbol=..&token=..` → `Quote`
//!
//! Every failure is mapped onto one of the four `FetchError` categories. The access
//! token is never written to logs or error messages.
use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use reqwest::Url;
use serde::de::DeserializeOwned;
use watchlist_common::net::{self, QUOTE_PATH, SYMBOLS_PATH};
use watchlist_common::{FetchError, Quote, Result, Symbol, WatchlistError};

/// Source of catalog and quote data.
pub trait MarketDataProvider: Send + Sync {
    /// Lists every tradable symbol on `exchange`, in provider order.
    fn fetch_symbols(&self, exchange: &str) -> Result<Vec<Symbol>, FetchError>;

    /// Fetches the current quote for `symbol`.
    fn fetch_quote(&self, symbol: &str) -> Result<Quote, FetchError>;
}

/// Connection settings for `FinnhubProvider`.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL, e.g. `https://finnhub.io/api/v1`.
    pub base_url: String,
    /// API token appended as the `token` query parameter.
    pub token: String,
    /// Per-request deadline covering connect, send and body read.
    pub timeout: Duration,
}

/// HTTP implementation of `MarketDataProvider`.
pub struct FinnhubProvider {
    http: Client,
    base_url: String,
    token: String,
}

impl FinnhubProvider {
    /// Builds the HTTP client. Fails only if the TLS backend cannot be initialised.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("watchlist_client/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| WatchlistError::Format(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: config.base_url,
            token: config.token,
        })
    }

    fn request_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, FetchError> {
        let raw = net::endpoint(&self.base_url, path);
        let mut url = Url::parse(&raw).map_err(|e| FetchError::InvalidRequest(format!("{}: {}", raw, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(FetchError::InvalidRequest(format!("unsupported scheme '{}'", url.scheme())));
        }
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("token", &self.token);
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|e| FetchError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Transport(format!("HTTP status {}", status)));
        }

        let body = response
            .bytes()
            .map_err(|e| FetchError::Transport(e.without_url().to_string()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(FetchError::EmptyResponse);
        }
        debug!("Received {} bytes", body.len());

        Ok(serde_json::from_slice::<T>(&body)?)
    }
}

impl MarketDataProvider for FinnhubProvider {
    fn fetch_symbols(&self, exchange: &str) -> Result<Vec<Symbol>, FetchError> {
        debug!("GET {} exchange={}", SYMBOLS_PATH, exchange);
        let url = self.request_url(SYMBOLS_PATH, &[("exchange", exchange)])?;
        self.get_json(url)
    }

    fn fetch_quote(&self, symbol: &str) -> Result<Quote, FetchError> {
        if symbol.trim().is_empty() {
            return Err(FetchError::InvalidRequest(String::from("empty symbol")));
        }
        debug!("GET {} symbol={}", QUOTE_PATH, symbol);
        let url = self.request_url(QUOTE_PATH, &[("symbol", symbol)])?;
        self.get_json(url)
    }
}
