//!
//! Common types and utilities shared by the watchlist client and the sandbox provider.
//!
//! This crate aggregates:
//! - `error`: `FetchError` with its failure categories, and the unified `WatchlistError`.
//! - `result`: handy `Result<T, WatchlistError>` alias.
//! - `symbol`: catalog `Symbol` type and case-insensitive search.
//! - `quote`: `Quote` payload with the provider's short field names.
//! - `net`: endpoint paths, defaults and small URL helpers.
#![warn(missing_docs)]
pub mod error;
pub mod net;
pub mod quote;
pub mod result;
pub mod symbol;

pub use error::{FailureCategory, FetchError, WatchlistError};
pub use quote::Quote;
pub use result::Result;
pub use symbol::{Symbol, SymbolSearch};
