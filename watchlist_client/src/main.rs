//! Watchlist Client: a terminal stock watchlist backed by a Finnhub-compatible REST API.
//!
//! On start it restores the persisted watchlist, requests the exchange's symbol catalog
//! in the background, and then reads commands from stdin. Catalog and quote requests run
//! on worker threads; their results come back over a channel and are applied on this
//! thread, which is the only one that touches application state.
//!
//! Usage example (CLI):
//! ```bash
//! FINNHUB_TOKEN=... watchlist_client --data-dir ~/.watchlist
//! watchlist_client --token sandbox --base-url http://127.0.0.1:8090 --ephemeral
//! ```
//!
//! Type `help` at the prompt for the command list. Logs go to stderr (`RUST_LOG`).
#![warn(missing_docs)]
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread;

use clap::Parser;
use crossbeam_channel::{Receiver, select, unbounded};
use log::{error, info};
use watchlist_client::app::AppState;
use watchlist_client::args::Args;
use watchlist_client::market::dispatcher::Dispatcher;
use watchlist_client::market::provider::FinnhubProvider;
use watchlist_client::shell::{Outcome, Shell, help_lines};
use watchlist_client::store::storage::{FileStore, KeyValueStore, MemoryStore};
use watchlist_client::store::watchlist::WatchlistStore;
use watchlist_common::{Result, WatchlistError};

fn main() -> Result<(), WatchlistError> {
    init_logger();
    let args = Args::parse();

    let (shutdown_tx, shutdown_rx) = unbounded::<()>();
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down client...");
        let _ = shutdown_tx.send(());
    })
    .map_err(|e| WatchlistError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;

    let provider = FinnhubProvider::new(args.provider_config())?;
    let (dispatcher, completions) = Dispatcher::channel(Arc::new(provider));

    let storage: Box<dyn KeyValueStore> = if args.ephemeral {
        info!("Ephemeral mode: the watchlist will not be saved");
        Box::new(MemoryStore::new())
    } else {
        info!("Watchlist directory: {}", args.data_dir.display());
        Box::new(FileStore::new(&args.data_dir))
    };
    let watchlist = WatchlistStore::open(storage);

    let mut state = AppState::new(watchlist, dispatcher, &args.exchange);
    let changes = state.subscribe();
    let shell = Shell::new();
    let input = spawn_input_reader();

    println!("Stocks ({})", state.exchange());
    print_lines(&help_lines());
    state.fetch_symbol_catalog();

    let mut needs_prompt = true;
    loop {
        for change in changes.try_iter() {
            let lines = shell.describe(&state, &change);
            if !lines.is_empty() {
                print_lines(&lines);
                needs_prompt = true;
            }
        }
        if needs_prompt {
            prompt();
            needs_prompt = false;
        }

        select! {
            recv(input) -> line => match line {
                Ok(line) => {
                    match shell.execute(&mut state, &line) {
                        Outcome::Continue(lines) => print_lines(&lines),
                        Outcome::Quit => break,
                    }
                    needs_prompt = true;
                }
                Err(_) => {
                    info!("Input closed");
                    break;
                }
            },
            recv(completions) -> msg => match msg {
                Ok(completion) => state.apply(completion),
                Err(e) => {
                    error!("Completion channel closed: {}", e);
                    return Err(WatchlistError::ChannelRecv(e.to_string()));
                }
            },
            recv(shutdown_rx) -> _ => break,
        }
    }

    info!("Client stopped.");
    Ok(())
}

/// Reads stdin on a background thread so the main loop can wait on input and
/// completions at the same time. The channel closes at end of input.
fn spawn_input_reader() -> Receiver<String> {
    let (tx, rx) = unbounded::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
}
