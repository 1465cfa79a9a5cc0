//! Synthetic trading sessions driven by a random walk.
//!
//! Each listed symbol carries one `Session`: the previous close it was seeded with,
//! the opening print, the running high/low, and the last price. `PriceBook::step`
//! moves every last price by a small random percentage; `PriceBook::quote` renders a
//! session as the provider's quote payload.
//!
//! Design notes:
//! - The walk is clamped to a minimum positive price so a session never goes to zero.
//! - Unknown symbols quote as all zeros, matching what the public provider returns.
use std::collections::HashMap;

use chrono::Utc;
use rand::Rng;
use watchlist_common::Quote;

/// Smallest price the walk can reach.
const MIN_PRICE: f64 = 0.01;

/// Calculate the next synthetic price using a small random walk around `current_price`.
///
/// The change is sampled uniformly from `[-1%, +1%)` and the result is clamped to
/// `MIN_PRICE`.
pub fn next_price(current_price: f64) -> f64 {
    let mut rng = rand::rng();
    let change: f64 = rng.random_range(-0.01..0.01);
    let new_price = current_price * (1.0 + change);
    new_price.max(MIN_PRICE)
}

/// One symbol's current session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Close of the previous session.
    pub previous_close: f64,
    /// First price of this session.
    pub open: f64,
    /// Highest price seen this session.
    pub high: f64,
    /// Lowest price seen this session.
    pub low: f64,
    /// Last price.
    pub last: f64,
}

impl Session {
    /// Opens a session gapping randomly away from `previous_close`.
    pub fn open(previous_close: f64) -> Self {
        let open = next_price(previous_close);
        Self {
            previous_close,
            open,
            high: open,
            low: open,
            last: open,
        }
    }

    /// Records a new last price.
    pub fn trade(&mut self, price: f64) {
        self.last = price;
        self.high = self.high.max(price);
        self.low = self.low.min(price);
    }

    /// Renders the session as a quote stamped with `timestamp` (UNIX seconds).
    pub fn to_quote(&self, timestamp: i64) -> Quote {
        let change = self.last - self.previous_close;
        Quote {
            current_price: round2(self.last),
            change: round2(change),
            change_percent: round4(change / self.previous_close * 100.0),
            high: round2(self.high),
            low: round2(self.low),
            open: round2(self.open),
            previous_close: round2(self.previous_close),
            timestamp: Some(timestamp),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// Sessions for every listed symbol.
#[derive(Debug, Default)]
pub struct PriceBook {
    sessions: HashMap<String, Session>,
}

impl PriceBook {
    /// Opens a session per `(symbol, previous close)` pair.
    pub fn open<'a>(reference: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let sessions = reference
            .into_iter()
            .map(|(symbol, close)| (symbol.to_string(), Session::open(close)))
            .collect();
        Self { sessions }
    }

    /// Number of tracked symbols.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Advances every session by one random-walk step.
    pub fn step(&mut self) {
        for session in self.sessions.values_mut() {
            session.trade(next_price(session.last));
        }
    }

    /// Current quote of `symbol`; all zeros if it is not listed.
    pub fn quote(&self, symbol: &str) -> Quote {
        match self.sessions.get(symbol) {
            Some(session) => session.to_quote(Utc::now().timestamp()),
            None => Quote {
                current_price: 0.0,
                change: 0.0,
                change_percent: 0.0,
                high: 0.0,
                low: 0.0,
                open: 0.0,
                previous_close: 0.0,
                timestamp: Some(0),
            },
        }
    }
}
