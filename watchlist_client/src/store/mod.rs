//! Local persistence: the key-value backends and the watchlist built on top of them.
pub mod storage;
pub mod watchlist;
