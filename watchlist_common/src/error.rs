//! Error types shared between the watchlist client and the sandbox provider.
//!
//! Two enums live here:
//! - `FetchError`: the four user-facing failure categories of a remote fetch. It is
//!   cheap to clone so a worker thread can hand it back to the state owner verbatim.
//! - `WatchlistError`: the unified error for everything else (I/O, JSON, storage,
//!   channels), allowing crates to propagate a single error type.
use std::io;
use std::sync::PoisonError;

use strum_macros::Display;
use thiserror::Error;

/// Category of a failed remote fetch.
///
/// Every category gets a distinct message but the same recovery: show it once,
/// let the user dismiss it, never retry automatically.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FailureCategory {
    InvalidRequest,
    TransportFailure,
    EmptyResponse,
    DecodeFailure,
}

/// Failure of one market-data request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request URL could not be built (bad base URL or blank symbol).
    #[error("Invalid URL: {0}")]
    InvalidRequest(String),

    /// Connection, TLS, timeout, or non-success HTTP status.
    #[error("Network error: {0}")]
    Transport(String),

    /// The transport succeeded but the body was empty.
    #[error("No data received")]
    EmptyResponse,

    /// The body did not match the expected schema.
    #[error("Failed to decode: {0}")]
    Decode(String),
}

impl FetchError {
    /// Failure category used for display and tests.
    pub fn category(&self) -> FailureCategory {
        match self {
            FetchError::InvalidRequest(_) => FailureCategory::InvalidRequest,
            FetchError::Transport(_) => FailureCategory::TransportFailure,
            FetchError::EmptyResponse => FailureCategory::EmptyResponse,
            FetchError::Decode(_) => FailureCategory::DecodeFailure,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum WatchlistError {
    /// I/O error originating from the standard library or sockets/files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// A remote fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The key-value store rejected a read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Crossbeam/channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl<T> From<PoisonError<T>> for WatchlistError {
    fn from(err: PoisonError<T>) -> Self {
        WatchlistError::MutexLock(err.to_string())
    }
}
