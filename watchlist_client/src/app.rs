//! Application state owned by the presentation thread.
//!
//! `AppState` holds the catalog, the watchlist, the selected symbol with its quote,
//! and per-flow request state. It is mutated only through its methods, all called
//! from the thread that owns it; worker results arrive as `Completion`s and are
//! folded in by `apply`.
//!
//! Two request flows exist (catalog and quote). Each moves
//! `Idle → Requesting → Succeeded | Failed`:
//! - the catalog is fetched only while empty and not already in flight;
//! - a quote fetch always re-issues, clears the old quote up front, and its
//!   response is dropped if the selection moved on in the meantime.
//!
//! Observers registered with `subscribe` receive a `StateChange` after every
//! visible mutation. Disconnected observers are pruned on the next broadcast.
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, info, warn};
use strum_macros::Display;
use watchlist_common::{FailureCategory, FetchError, Quote, Symbol, SymbolSearch};

use crate::market::dispatcher::{Completion, Dispatcher};
use crate::store::watchlist::WatchlistStore;

/// The two independent request flows.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Flow {
    #[strum(serialize = "catalog")]
    Symbols,
    #[strum(serialize = "quote")]
    Quote,
}

/// Lifecycle of one request flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    /// Nothing requested yet.
    Idle,
    /// A request is in flight.
    Requesting,
    /// The last request decoded successfully.
    Succeeded,
    /// The last request failed with this category.
    Failed(FailureCategory),
}

/// Notification sent to observers after a mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    /// A catalog request went out.
    CatalogLoading,
    /// The catalog was replaced.
    CatalogUpdated {
        /// Number of symbols now in the catalog.
        count: usize,
    },
    /// The watchlist gained or lost an entry.
    WatchlistUpdated,
    /// A detail view opened for `symbol`; its quote is loading.
    QuoteLoading {
        /// Identity being fetched.
        symbol: String,
    },
    /// A fresh quote for the selected symbol arrived.
    QuoteUpdated {
        /// Identity the quote belongs to.
        symbol: String,
    },
    /// The detail view was closed.
    SelectionCleared,
    /// A request failed; the message awaits acknowledgement.
    ErrorRaised {
        /// Flow that failed.
        flow: Flow,
        /// User-facing message.
        message: String,
    },
    /// The pending error was acknowledged.
    ErrorDismissed,
}

/// Explicit application state.
pub struct AppState {
    exchange: String,
    catalog: Vec<Symbol>,
    watchlist: WatchlistStore,
    selected: Option<Symbol>,
    quote_target: Option<String>,
    quote: Option<Quote>,
    symbols_flow: FlowState,
    quote_flow: FlowState,
    alert: Option<(Flow, FetchError)>,
    dispatcher: Dispatcher,
    observers: Vec<Sender<StateChange>>,
}

impl AppState {
    /// Creates state around a restored watchlist. Nothing is fetched until asked.
    pub fn new(watchlist: WatchlistStore, dispatcher: Dispatcher, exchange: &str) -> Self {
        Self {
            exchange: exchange.to_string(),
            catalog: Vec::new(),
            watchlist,
            selected: None,
            quote_target: None,
            quote: None,
            symbols_flow: FlowState::Idle,
            quote_flow: FlowState::Idle,
            alert: None,
            dispatcher,
            observers: Vec::new(),
        }
    }

    /// Registers a new observer.
    pub fn subscribe(&mut self) -> Receiver<StateChange> {
        let (tx, rx) = unbounded::<StateChange>();
        self.observers.push(tx);
        rx
    }

    fn notify(&mut self, change: StateChange) {
        self.observers.retain(|tx| tx.send(change.clone()).is_ok());
    }

    /// Exchange whose catalog is listed.
    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// Full catalog in provider order; empty until the first successful fetch.
    pub fn catalog(&self) -> &[Symbol] {
        &self.catalog
    }

    /// Catalog entries matching `query`, see `SymbolSearch::search`.
    pub fn search(&self, query: &str) -> Vec<&Symbol> {
        self.catalog.search(query)
    }

    /// Watchlist in display order.
    pub fn watchlist(&self) -> &[Symbol] {
        self.watchlist.symbols()
    }

    /// Symbol whose detail view is open.
    pub fn selected(&self) -> Option<&Symbol> {
        self.selected.as_ref()
    }

    /// Quote for the most recently requested symbol, if it has arrived.
    pub fn quote(&self) -> Option<&Quote> {
        self.quote.as_ref()
    }

    /// State of the catalog flow.
    pub fn symbols_flow(&self) -> &FlowState {
        &self.symbols_flow
    }

    /// State of the quote flow.
    pub fn quote_flow(&self) -> &FlowState {
        &self.quote_flow
    }

    /// `true` while a catalog request is in flight.
    pub fn is_loading_symbols(&self) -> bool {
        self.symbols_flow == FlowState::Requesting
    }

    /// `true` while a quote request is in flight.
    pub fn is_loading_quote(&self) -> bool {
        self.quote_flow == FlowState::Requesting
    }

    /// `true` while an error waits for acknowledgement.
    pub fn has_error(&self) -> bool {
        self.alert.is_some()
    }

    /// Message of the pending error.
    pub fn error_message(&self) -> Option<String> {
        self.alert.as_ref().map(|(_, e)| e.to_string())
    }

    /// Pending error with the flow that raised it.
    pub fn error(&self) -> Option<(Flow, &FetchError)> {
        self.alert.as_ref().map(|(flow, e)| (*flow, e))
    }

    /// Acknowledges the pending error. Returns `false` if there was none.
    pub fn dismiss_error(&mut self) -> bool {
        if self.alert.take().is_some() {
            self.notify(StateChange::ErrorDismissed);
            true
        } else {
            false
        }
    }

    fn clear_alert_for(&mut self, flow: Flow) {
        if matches!(self.alert, Some((f, _)) if f == flow) {
            self.alert = None;
            self.notify(StateChange::ErrorDismissed);
        }
    }

    /// Requests the catalog unless it is already populated or being fetched.
    ///
    /// Returns `true` if a request was dispatched. A failed fetch leaves the catalog
    /// empty, so calling this again retries.
    pub fn fetch_symbol_catalog(&mut self) -> bool {
        if !self.catalog.is_empty() || self.is_loading_symbols() {
            debug!("Catalog fetch skipped");
            return false;
        }
        self.symbols_flow = FlowState::Requesting;
        self.clear_alert_for(Flow::Symbols);
        self.notify(StateChange::CatalogLoading);
        self.dispatcher.fetch_symbols(&self.exchange);
        true
    }

    /// Requests a fresh quote for `identity`, discarding the current one immediately.
    pub fn fetch_quote(&mut self, identity: &str) {
        self.quote = None;
        self.quote_target = Some(identity.to_string());
        self.quote_flow = FlowState::Requesting;
        self.clear_alert_for(Flow::Quote);
        self.notify(StateChange::QuoteLoading {
            symbol: identity.to_string(),
        });
        self.dispatcher.fetch_quote(identity);
    }

    /// Opens the detail view for `symbol` and fetches its quote.
    pub fn select(&mut self, symbol: Symbol) {
        let identity = symbol.symbol.clone();
        self.selected = Some(symbol);
        self.fetch_quote(&identity);
    }

    /// Closes the detail view. Late quote responses are ignored afterwards.
    pub fn close_detail(&mut self) {
        if self.selected.is_none() && self.quote_target.is_none() {
            return;
        }
        self.selected = None;
        self.quote_target = None;
        self.quote = None;
        if self.quote_flow == FlowState::Requesting {
            self.quote_flow = FlowState::Idle;
        }
        self.notify(StateChange::SelectionCleared);
    }

    /// Adds `symbol` to the watchlist; a no-op if its identity is already there.
    pub fn add(&mut self, symbol: Symbol) -> bool {
        let changed = self.watchlist.add(symbol);
        if changed {
            self.notify(StateChange::WatchlistUpdated);
        }
        changed
    }

    /// Removes `symbol` from the watchlist. Storage is rewritten either way.
    pub fn remove(&mut self, symbol: &Symbol) -> bool {
        let changed = self.watchlist.remove(symbol);
        if changed {
            self.notify(StateChange::WatchlistUpdated);
        }
        changed
    }

    /// Folds a worker result into the state. Must run on the owning thread.
    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Symbols { exchange, result } => self.apply_symbols(exchange, result),
            Completion::Quote { symbol, result } => self.apply_quote(symbol, result),
        }
    }

    fn apply_symbols(&mut self, exchange: String, result: Result<Vec<Symbol>, FetchError>) {
        match result {
            Ok(symbols) => {
                info!("Loaded {} symbols for exchange {}", symbols.len(), exchange);
                self.catalog = symbols;
                self.symbols_flow = FlowState::Succeeded;
                self.notify(StateChange::CatalogUpdated {
                    count: self.catalog.len(),
                });
            }
            Err(e) => {
                warn!("Catalog fetch for {} failed: {}", exchange, e);
                self.symbols_flow = FlowState::Failed(e.category());
                self.raise(Flow::Symbols, e);
            }
        }
    }

    fn apply_quote(&mut self, symbol: String, result: Result<Quote, FetchError>) {
        if self.quote_target.as_deref() != Some(symbol.as_str()) {
            debug!("Discarding stale quote response for {}", symbol);
            return;
        }
        match result {
            Ok(quote) => {
                self.quote = Some(quote);
                self.quote_flow = FlowState::Succeeded;
                self.notify(StateChange::QuoteUpdated { symbol });
            }
            Err(e) => {
                warn!("Quote fetch for {} failed: {}", symbol, e);
                self.quote = None;
                self.quote_flow = FlowState::Failed(e.category());
                self.raise(Flow::Quote, e);
            }
        }
    }

    /// Records `error` as the pending alert. The first pending alert wins; a later one
    /// is only logged so the message the user has not seen yet is never replaced.
    fn raise(&mut self, flow: Flow, error: FetchError) {
        if let Some((pending, _)) = &self.alert {
            warn!("Dropping {} error while a {} error is pending: {}", flow, pending, error);
            return;
        }
        let message = error.to_string();
        self.alert = Some((flow, error));
        self.notify(StateChange::ErrorRaised { flow, message });
    }
}
