//! Domain models for the sandbox provider.
//!
//! - `catalog`: the fixed list of tradable symbols and their reference prices.
//! - `price_book`: per-symbol sessions advanced by a random walk.

pub mod catalog;
pub mod price_book;
