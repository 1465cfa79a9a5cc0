use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use watchlist_client::app::{AppState, Flow, FlowState, StateChange};
use watchlist_client::market::dispatcher::{Completion, Dispatcher};
use watchlist_client::market::provider::MarketDataProvider;
use watchlist_client::shell::{Outcome, Shell};
use watchlist_client::store::storage::{FileStore, MemoryStore};
use watchlist_client::store::watchlist::{WATCHLIST_KEY, WatchlistStore};
use watchlist_common::{FailureCategory, FetchError, Quote, Symbol};

const CATALOG: &str =
    r#"[{"symbol":"AAPL","description":"Apple Inc","currency":"USD","type":"Common Stock"}]"#;
const WAIT: Duration = Duration::from_secs(5);

/// Provider that answers from canned JSON and counts calls.
struct Scripted {
    catalog: Result<&'static str, FetchError>,
    quote_body: &'static str,
    symbol_calls: AtomicUsize,
    quote_calls: AtomicUsize,
}

impl Scripted {
    fn new(catalog: Result<&'static str, FetchError>, quote_body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            catalog,
            quote_body,
            symbol_calls: AtomicUsize::new(0),
            quote_calls: AtomicUsize::new(0),
        })
    }
}

impl MarketDataProvider for Scripted {
    fn fetch_symbols(&self, _exchange: &str) -> Result<Vec<Symbol>, FetchError> {
        self.symbol_calls.fetch_add(1, Ordering::SeqCst);
        let body = self.catalog.clone()?;
        Ok(serde_json::from_str(body)?)
    }

    fn fetch_quote(&self, _symbol: &str) -> Result<Quote, FetchError> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::from_str(self.quote_body)?)
    }
}

fn app(provider: Arc<dyn MarketDataProvider>, storage: MemoryStore) -> (AppState, Receiver<Completion>) {
    let (dispatcher, completions) = Dispatcher::channel(provider);
    let watchlist = WatchlistStore::open(Box::new(storage));
    (AppState::new(watchlist, dispatcher, "US"), completions)
}

fn pump(state: &mut AppState, completions: &Receiver<Completion>) {
    let completion = completions.recv_timeout(WAIT).expect("completion");
    state.apply(completion);
}

fn aapl() -> Symbol {
    Symbol::new("AAPL", "Apple Inc", "USD", "Common Stock")
}

#[test]
fn catalog_add_remove_scenario() {
    let provider = Scripted::new(Ok(CATALOG), "{}");
    let storage = MemoryStore::new();
    let (mut state, completions) = app(provider, storage.clone());

    assert!(state.fetch_symbol_catalog());
    assert!(state.is_loading_symbols());
    pump(&mut state, &completions);

    assert_eq!(state.catalog(), &[aapl()]);
    assert_eq!(state.symbols_flow(), &FlowState::Succeeded);

    assert!(state.add(state.catalog()[0].clone()));
    assert_eq!(state.watchlist(), &[aapl()]);

    assert!(state.remove(&aapl()));
    assert!(state.watchlist().is_empty());
    assert_eq!(storage.get_json(), "[]");
}

#[test]
fn catalog_is_fetched_once() {
    let provider = Scripted::new(Ok(CATALOG), "{}");
    let (mut state, completions) = app(provider.clone(), MemoryStore::new());

    assert!(state.fetch_symbol_catalog());
    assert!(!state.fetch_symbol_catalog(), "in-flight fetch must not be duplicated");
    pump(&mut state, &completions);
    assert!(!state.fetch_symbol_catalog());

    assert_eq!(provider.symbol_calls.load(Ordering::SeqCst), 1);
    assert!(completions.recv_timeout(Duration::from_millis(100)).is_err());
}

#[test]
fn failed_catalog_can_be_retried() {
    let provider = Scripted::new(Err(FetchError::Transport(String::from("offline"))), "{}");
    let (mut state, completions) = app(provider.clone(), MemoryStore::new());

    state.fetch_symbol_catalog();
    pump(&mut state, &completions);
    assert!(state.catalog().is_empty());
    assert_eq!(state.error().map(|(flow, _)| flow), Some(Flow::Symbols));

    assert!(state.fetch_symbol_catalog());
    assert!(!state.has_error());
    pump(&mut state, &completions);
    assert_eq!(provider.symbol_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn quote_is_cleared_while_requesting() {
    let body = r#"{"c":189.5,"d":1.5,"dp":0.8,"h":190,"l":187,"o":188,"pc":188}"#;
    let provider = Scripted::new(Ok(CATALOG), body);
    let (mut state, completions) = app(provider.clone(), MemoryStore::new());

    state.select(aapl());
    pump(&mut state, &completions);
    assert_eq!(state.quote().map(|q| q.current_price), Some(189.5));

    state.select(aapl());
    assert!(state.quote().is_none());
    assert!(state.is_loading_quote());
    pump(&mut state, &completions);
    assert!(state.quote().is_some());
    assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn undecodable_quote_fails_with_decode_category() {
    let provider = Scripted::new(Ok(CATALOG), r#"{"c": "not-a-number"}"#);
    let storage = MemoryStore::new();
    let (mut state, completions) = app(provider, storage.clone());
    state.add(aapl());
    let persisted = storage.get_json();

    state.select(aapl());
    pump(&mut state, &completions);

    assert_eq!(state.quote_flow(), &FlowState::Failed(FailureCategory::DecodeFailure));
    assert!(!state.is_loading_quote());
    assert!(state.quote().is_none());
    assert!(state.error_message().unwrap().starts_with("Failed to decode: "));
    assert_eq!(state.watchlist(), &[aapl()]);
    assert_eq!(storage.get_json(), persisted);
}

/// Holds AAPL quotes until released so responses can be reordered on purpose.
struct Gated {
    release: Receiver<()>,
}

impl MarketDataProvider for Gated {
    fn fetch_symbols(&self, _exchange: &str) -> Result<Vec<Symbol>, FetchError> {
        Ok(Vec::new())
    }

    fn fetch_quote(&self, symbol: &str) -> Result<Quote, FetchError> {
        if symbol == "AAPL" {
            let _ = self.release.recv_timeout(WAIT);
        }
        let price = if symbol == "AAPL" { 100.0 } else { 200.0 };
        Ok(Quote {
            current_price: price,
            change: 0.0,
            change_percent: 0.0,
            high: price,
            low: price,
            open: price,
            previous_close: price,
            timestamp: None,
        })
    }
}

#[test]
fn late_quote_for_previous_selection_is_discarded() {
    let (release_tx, release_rx): (Sender<()>, Receiver<()>) = unbounded();
    let (mut state, completions) = app(Arc::new(Gated { release: release_rx }), MemoryStore::new());
    let msft = Symbol::new("MSFT", "Microsoft Corp", "USD", "Common Stock");

    state.select(aapl());
    state.select(msft.clone());
    pump(&mut state, &completions);
    assert_eq!(state.quote().map(|q| q.current_price), Some(200.0));

    release_tx.send(()).unwrap();
    pump(&mut state, &completions);
    assert_eq!(state.selected(), Some(&msft));
    assert_eq!(state.quote().map(|q| q.current_price), Some(200.0));
}

#[test]
fn watchlist_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Scripted::new(Ok(CATALOG), "{}");
    {
        let (dispatcher, _rx) = Dispatcher::channel(provider.clone());
        let watchlist = WatchlistStore::open(Box::new(FileStore::new(dir.path())));
        let mut state = AppState::new(watchlist, dispatcher, "US");
        state.add(aapl());
        state.add(aapl());
    }
    let (dispatcher, _rx) = Dispatcher::channel(provider);
    let watchlist = WatchlistStore::open(Box::new(FileStore::new(dir.path())));
    let state = AppState::new(watchlist, dispatcher, "US");
    assert_eq!(state.watchlist(), &[aapl()]);
}

#[test]
fn shell_drives_the_whole_flow() {
    let body = r#"{"c":189.5,"d":-1.5,"dp":-0.8,"h":190,"l":187,"o":188,"pc":191}"#;
    let provider = Scripted::new(Ok(CATALOG), body);
    let (mut state, completions) = app(provider, MemoryStore::new());
    let changes = state.subscribe();
    let shell = Shell::new();

    state.fetch_symbol_catalog();
    pump(&mut state, &completions);

    assert_eq!(
        shell.execute(&mut state, "search apple"),
        Outcome::Continue(vec![String::from("  AAPL       Apple Inc")])
    );
    assert_eq!(shell.execute(&mut state, "add aapl"), Outcome::Continue(Vec::new()));
    assert_eq!(
        shell.execute(&mut state, "add AAPL"),
        Outcome::Continue(vec![String::from("AAPL is already in the watchlist.")])
    );

    assert_eq!(shell.execute(&mut state, "quote AAPL"), Outcome::Continue(Vec::new()));
    pump(&mut state, &completions);

    let printed: Vec<String> = changes
        .try_iter()
        .flat_map(|change| shell.describe(&state, &change))
        .collect();
    assert!(printed.contains(&String::from("Loaded 1 stocks from US.")));
    assert!(printed.contains(&String::from("Current Price: $189.50")));

    assert_eq!(shell.execute(&mut state, "remove AAPL"), Outcome::Continue(Vec::new()));
    assert!(state.watchlist().is_empty());
    assert_eq!(shell.execute(&mut state, "quit"), Outcome::Quit);
}

#[test]
fn shell_blocks_until_error_is_dismissed() {
    let provider = Scripted::new(Err(FetchError::EmptyResponse), "{}");
    let (mut state, completions) = app(provider, MemoryStore::new());
    let changes = state.subscribe();
    let shell = Shell::new();

    state.fetch_symbol_catalog();
    pump(&mut state, &completions);
    assert!(changes.try_iter().any(|c| matches!(
        c,
        StateChange::ErrorRaised { flow: Flow::Symbols, ref message } if message == "No data received"
    )));

    assert_eq!(
        shell.execute(&mut state, "list"),
        Outcome::Continue(vec![String::from("Dismiss the error first with 'ok'.")])
    );
    assert_eq!(shell.execute(&mut state, "OK"), Outcome::Continue(Vec::new()));
    assert!(!state.has_error());
    assert_eq!(
        shell.execute(&mut state, "list"),
        Outcome::Continue(vec![String::from("Added Stocks"), String::from("  No stocks added yet.")])
    );
}

trait PersistedJson {
    fn get_json(&self) -> String;
}

impl PersistedJson for MemoryStore {
    fn get_json(&self) -> String {
        use watchlist_client::store::storage::KeyValueStore;
        let bytes = self.get(WATCHLIST_KEY).unwrap().unwrap_or_default();
        String::from_utf8(bytes).unwrap()
    }
}
