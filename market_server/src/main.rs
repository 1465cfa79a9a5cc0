//! Sandbox market-data provider.
//!
//! This binary serves the two read-only endpoints the watchlist client consumes, so the
//! client can run without network access or a real API token. It runs two parts:
//!
//! - Market thread: advances the `PriceBook` random walk on a crossbeam `tick` and
//!   stops when `main` drops its stop channel.
//! - HTTP server: an `axum` router on a tokio runtime. Handlers lock the shared
//!   price book only long enough to render a quote.
//!
//! Ctrl+C stops the server gracefully; the market thread is then stopped and joined.
//!
//! Endpoints:
//! - `GET /stock/symbol?exchange=US[&token=..]`: the fixed catalog (`[]` for other exchanges).
//! - `GET /quote?symbol=AAPL[&token=..]`: the symbol's current session as a quote.
#![warn(missing_docs)]
use std::future;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use clap::Parser;
use crossbeam_channel::{Receiver, bounded, select, tick};
use log::{error, info};
use watchlist_common::net::addr;
use watchlist_common::{Result, WatchlistError};

use crate::args::Args;
use crate::model::catalog;
use crate::model::price_book::PriceBook;
use crate::routes::MarketContext;

mod args;
mod error;
pub mod model;
mod routes;

fn run_market(book: Arc<Mutex<PriceBook>>, interval: Duration, stop_rx: Receiver<()>) {
    let ticker = tick(interval);
    info!("Market thread started, stepping every {:?}", interval);
    loop {
        select! {
            recv(ticker) -> _ => match book.lock() {
                Ok(mut book) => book.step(),
                Err(e) => {
                    error!("Price book lock poisoned: {}", e);
                    break;
                }
            },
            recv(stop_rx) -> _ => break,
        }
    }
    info!("Market thread stopping...");
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl+C received. Shutting down server..."),
        Err(e) => {
            error!("Error setting Ctrl+C handler: {}", e);
            future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), WatchlistError> {
    init_logger();
    let args = Args::parse();

    let book = PriceBook::open(catalog::reference_prices());
    info!("Opened sessions for {} symbols", book.len());
    let book = Arc::new(Mutex::new(book));
    let ctx = Arc::new(MarketContext {
        catalog: catalog::symbols(),
        book: Arc::clone(&book),
        token: args.token.clone().filter(|t| !t.trim().is_empty()),
    });
    if ctx.token.is_none() {
        info!("No token configured: every request is accepted");
    }

    let (stop_tx, stop_rx) = bounded::<()>(0);
    let interval = Duration::from_millis(args.tick_ms.max(1));
    let market = thread::spawn(move || run_market(book, interval, stop_rx));

    let listener = tokio::net::TcpListener::bind(addr("0.0.0.0", args.port)).await?;
    info!("Sandbox provider listening on {}", listener.local_addr()?);
    axum::serve(listener, routes::router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    drop(stop_tx);
    if market.join().is_err() {
        error!("Market thread panicked");
    }
    info!("Server stopped.");
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
