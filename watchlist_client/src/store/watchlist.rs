//! The user's persisted, ordered, de-duplicated watchlist.
//!
//! Every mutation is written through to the backing `KeyValueStore` before it
//! returns. Storage is best-effort: read and write failures are logged and the
//! in-memory list stays authoritative for the rest of the session.
use log::{error, info, warn};
use watchlist_common::{Result, Symbol, WatchlistError};

use crate::store::storage::KeyValueStore;

/// Storage key holding the serialized watchlist.
pub const WATCHLIST_KEY: &str = "MainStocks";

/// Ordered list of user-added symbols with write-through persistence.
pub struct WatchlistStore {
    symbols: Vec<Symbol>,
    storage: Box<dyn KeyValueStore>,
}

impl WatchlistStore {
    /// Opens the store and restores any previously persisted watchlist.
    ///
    /// A missing or undecodable blob yields an empty watchlist.
    pub fn open(storage: Box<dyn KeyValueStore>) -> Self {
        let mut store = Self {
            symbols: Vec::new(),
            storage,
        };
        store.symbols = match store.restore() {
            Ok(Some(symbols)) => {
                info!("Restored {} watchlist entries", symbols.len());
                symbols
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to load main stocks, starting empty: {}", e);
                Vec::new()
            }
        };
        store
    }

    /// Symbols in display order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` when the watchlist has no entries.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns `true` if a symbol with this identity is already present.
    pub fn contains(&self, identity: &str) -> bool {
        self.symbols.iter().any(|s| s.symbol == identity)
    }

    /// Appends `symbol` unless its identity is already present. Returns whether the list changed.
    pub fn add(&mut self, symbol: Symbol) -> bool {
        if self.contains(&symbol.symbol) {
            return false;
        }
        info!("Adding {} to watchlist", symbol.symbol);
        self.symbols.push(symbol);
        self.persist();
        true
    }

    /// Removes every entry sharing `symbol`'s identity and persists, even when nothing matched.
    /// Returns whether the list changed.
    pub fn remove(&mut self, symbol: &Symbol) -> bool {
        let before = self.symbols.len();
        self.symbols.retain(|s| !s.same_identity(symbol));
        let changed = self.symbols.len() != before;
        if changed {
            info!("Removed {} from watchlist", symbol.symbol);
        }
        self.persist();
        changed
    }

    /// Writes the full list under `WATCHLIST_KEY`. Failures are logged and swallowed.
    pub fn persist(&mut self) {
        if let Err(e) = self.try_persist() {
            error!("Failed to save main stocks: {}", e);
        }
    }

    fn try_persist(&mut self) -> Result<()> {
        let encoded = serde_json::to_vec(&self.symbols)?;
        self.storage.set(WATCHLIST_KEY, &encoded)
    }

    /// Reads and decodes the persisted list, `Ok(None)` if nothing was stored.
    pub fn restore(&self) -> Result<Option<Vec<Symbol>>> {
        let Some(bytes) = self.storage.get(WATCHLIST_KEY)? else {
            return Ok(None);
        };
        let symbols: Vec<Symbol> = serde_json::from_slice(&bytes)?;
        if let Some(dup) = first_duplicate(&symbols) {
            return Err(WatchlistError::Format(format!(
                "duplicate symbol '{}' in stored watchlist",
                dup
            )));
        }
        Ok(Some(symbols))
    }
}

fn first_duplicate(symbols: &[Symbol]) -> Option<&str> {
    symbols
        .iter()
        .enumerate()
        .find(|(i, s)| symbols[..*i].iter().any(|earlier| earlier.same_identity(s)))
        .map(|(_, s)| s.symbol.as_str())
}
