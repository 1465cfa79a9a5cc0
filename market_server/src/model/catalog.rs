//! Fixed symbol catalog served by the sandbox.
use watchlist_common::Symbol;

/// Exchange code the catalog is listed under.
pub const EXCHANGE: &str = "US";

/// `(symbol, description, type, reference price)` for every listed instrument.
const LISTINGS: &[(&str, &str, &str, f64)] = &[
    ("AAPL", "APPLE INC", "Common Stock", 189.50),
    ("MSFT", "MICROSOFT CORP", "Common Stock", 415.20),
    ("GOOGL", "ALPHABET INC-CL A", "Common Stock", 172.60),
    ("AMZN", "AMAZON.COM INC", "Common Stock", 183.10),
    ("NVDA", "NVIDIA CORP", "Common Stock", 121.40),
    ("META", "META PLATFORMS INC-CLASS A", "Common Stock", 495.80),
    ("TSLA", "TESLA INC", "Common Stock", 177.30),
    ("JPM", "JPMORGAN CHASE & CO", "Common Stock", 198.70),
    ("V", "VISA INC-CLASS A SHARES", "Common Stock", 274.90),
    ("DIS", "WALT DISNEY CO/THE", "Common Stock", 102.30),
    ("NFLX", "NETFLIX INC", "Common Stock", 640.10),
    ("INTC", "INTEL CORP", "Common Stock", 30.80),
    ("PEP", "PEPSICO INC", "Common Stock", 171.20),
    ("COST", "COSTCO WHOLESALE CORP", "Common Stock", 812.40),
    ("SBUX", "STARBUCKS CORP", "Common Stock", 79.60),
    ("T", "AT&T INC", "Common Stock", 17.40),
    ("BRK.B", "BERKSHIRE HATHAWAY INC-CL B", "Common Stock", 408.90),
    ("SPY", "SPDR S&P 500 ETF TRUST", "ETP", 528.30),
    ("QQQ", "INVESCO QQQ TRUST SERIES 1", "ETP", 452.10),
    ("PINE", "ALPINE INCOME PROPERTY TRUS", "REIT", 15.70),
];

/// The catalog in listing order.
pub fn symbols() -> Vec<Symbol> {
    LISTINGS
        .iter()
        .map(|(symbol, description, kind, _)| Symbol::new(symbol, description, "USD", kind))
        .collect()
}

/// Reference prices used to seed the price book.
pub fn reference_prices() -> impl Iterator<Item = (&'static str, f64)> {
    LISTINGS.iter().map(|(symbol, _, _, price)| (*symbol, *price))
}
