//! Watchlist client library.
//!
//! - `store`: key-value backends and the persisted `WatchlistStore`.
//! - `market`: the `MarketDataProvider` seam, its HTTP implementation, and the
//!   `Dispatcher` that runs requests on worker threads.
//! - `app`: `AppState`, the single-owner state with observer notifications.
//! - `shell`: the terminal front end.
//! - `args`: command-line configuration.
#![warn(missing_docs)]
pub mod app;
pub mod args;
pub mod market;
pub mod shell;
pub mod store;
