//! Tradable symbols and catalog search helpers shared between client and server.
use serde::{Deserialize, Serialize};

/// A tradable security as listed by the provider's catalog endpoint.
///
/// Identity is the `symbol` field alone; the remaining fields are display metadata.
/// Unknown JSON fields (`displaySymbol`, `figi`, `mic`, ...) are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Exchange ticker, e.g. `AAPL`.
    pub symbol: String,
    /// Company or instrument name.
    pub description: String,
    /// Trading currency, e.g. `USD`.
    pub currency: String,
    /// Security type as reported by the provider, e.g. `Common Stock`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Symbol {
    /// Creates a new symbol.
    pub fn new(symbol: &str, description: &str, currency: &str, kind: &str) -> Self {
        Symbol {
            symbol: String::from(symbol),
            description: String::from(description),
            currency: String::from(currency),
            kind: String::from(kind),
        }
    }

    /// Returns `true` when both symbols share the same identity.
    pub fn same_identity(&self, other: &Symbol) -> bool {
        self.symbol == other.symbol
    }

    /// Case-insensitive substring match against symbol or description.
    ///
    /// `needle` must already be lowercase.
    fn matches_lowercase(&self, needle: &str) -> bool {
        self.symbol.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Search over an ordered list of symbols.
pub trait SymbolSearch {
    /// Returns the symbols whose ticker or description contains `query`, ignoring case,
    /// in their original order. A blank query returns everything.
    fn search(&self, query: &str) -> Vec<&Symbol>;

    /// Finds a symbol by exact identity.
    fn find(&self, identity: &str) -> Option<&Symbol>;
}

impl SymbolSearch for [Symbol] {
    fn search(&self, query: &str) -> Vec<&Symbol> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.iter().collect();
        }
        self.iter().filter(|s| s.matches_lowercase(&needle)).collect()
    }

    fn find(&self, identity: &str) -> Option<&Symbol> {
        self.iter().find(|s| s.symbol == identity)
    }
}
