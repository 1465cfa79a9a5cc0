//! Fire-and-forget dispatch of market-data requests.
//!
//! Each fetch runs on its own worker thread and reports back with exactly one
//! `Completion` on the channel owned by the state thread. Callers never block and
//! cannot cancel a request; the provider's timeout bounds how long a worker lives.
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, error};
use watchlist_common::{FetchError, Quote, Symbol};

use crate::market::provider::MarketDataProvider;

/// Result of one request, tagged with what was asked for.
#[derive(Debug, Clone)]
pub enum Completion {
    /// Catalog listing for `exchange`.
    Symbols {
        /// Exchange the catalog was requested for.
        exchange: String,
        /// Decoded catalog or the failure.
        result: Result<Vec<Symbol>, FetchError>,
    },
    /// Quote for `symbol`.
    Quote {
        /// Identity the quote was requested for.
        symbol: String,
        /// Decoded quote or the failure.
        result: Result<Quote, FetchError>,
    },
}

/// Spawns provider calls off the calling thread.
#[derive(Clone)]
pub struct Dispatcher {
    provider: Arc<dyn MarketDataProvider>,
    tx: Sender<Completion>,
}

impl Dispatcher {
    /// Creates a dispatcher that reports to `tx`.
    pub fn new(provider: Arc<dyn MarketDataProvider>, tx: Sender<Completion>) -> Self {
        Self { provider, tx }
    }

    /// Creates a dispatcher together with the receiving end of its completion channel.
    pub fn channel(provider: Arc<dyn MarketDataProvider>) -> (Self, Receiver<Completion>) {
        let (tx, rx) = unbounded::<Completion>();
        (Self::new(provider, tx), rx)
    }

    /// Requests the catalog of `exchange`.
    pub fn fetch_symbols(&self, exchange: &str) {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let exchange = exchange.to_string();
        thread::spawn(move || {
            debug!("Fetching catalog for exchange {}", exchange);
            let result = provider.fetch_symbols(&exchange);
            deliver(&tx, Completion::Symbols { exchange, result });
        });
    }

    /// Requests the current quote of `symbol`.
    pub fn fetch_quote(&self, symbol: &str) {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let symbol = symbol.to_string();
        thread::spawn(move || {
            debug!("Fetching quote for {}", symbol);
            let result = provider.fetch_quote(&symbol);
            deliver(&tx, Completion::Quote { symbol, result });
        });
    }
}

fn deliver(tx: &Sender<Completion>, completion: Completion) {
    if let Err(e) = tx.send(completion) {
        // The state thread is gone; nobody is left to show the result.
        error!("Failed to deliver completion: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct Fixed;

    impl MarketDataProvider for Fixed {
        fn fetch_symbols(&self, _exchange: &str) -> Result<Vec<Symbol>, FetchError> {
            Ok(vec![Symbol::new("AAPL", "Apple Inc", "USD", "Common Stock")])
        }

        fn fetch_quote(&self, _symbol: &str) -> Result<Quote, FetchError> {
            Err(FetchError::EmptyResponse)
        }
    }

    #[test]
    fn each_fetch_delivers_exactly_one_completion() {
        let (dispatcher, rx) = Dispatcher::channel(Arc::new(Fixed));
        dispatcher.fetch_symbols("US");
        dispatcher.fetch_quote("AAPL");

        let mut symbols = 0;
        let mut quotes = 0;
        for _ in 0..2 {
            match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                Completion::Symbols { exchange, result } => {
                    assert_eq!(exchange, "US");
                    assert_eq!(result.unwrap().len(), 1);
                    symbols += 1;
                }
                Completion::Quote { symbol, result } => {
                    assert_eq!(symbol, "AAPL");
                    assert_eq!(result.unwrap_err(), FetchError::EmptyResponse);
                    quotes += 1;
                }
            }
        }
        assert_eq!((symbols, quotes), (1, 1));
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }
}
