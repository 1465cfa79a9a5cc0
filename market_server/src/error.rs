//! Error responses of the sandbox API.
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use watchlist_common::WatchlistError;

/// Failure of one API request, rendered as `{"error": message}`.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required query parameter is missing or blank.
    #[error("{0}")]
    BadRequest(String),

    /// A token is configured and the request did not carry it.
    #[error("Invalid API key")]
    Unauthorized,

    /// No route matches the path.
    #[error("not found")]
    NotFound,

    /// The server could not produce a response.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

impl From<WatchlistError> for ApiError {
    fn from(err: WatchlistError) -> Self {
        Self::Internal(err.to_string())
    }
}
