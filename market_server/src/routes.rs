//! Router and handlers for the two provider endpoints.
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use log::{debug, warn};
use serde::Deserialize;
use watchlist_common::net::{QUOTE_PATH, SYMBOLS_PATH};
use watchlist_common::{Quote, Symbol, WatchlistError};

use crate::error::ApiError;
use crate::model::catalog::EXCHANGE;
use crate::model::price_book::PriceBook;

/// Everything a request handler can see.
pub struct MarketContext {
    /// Listed symbols, served by `/stock/symbol`.
    pub catalog: Vec<Symbol>,
    /// Live sessions, advanced by the market thread.
    pub book: Arc<Mutex<PriceBook>>,
    /// Required `token` parameter; `None` accepts any.
    pub token: Option<String>,
}

impl MarketContext {
    fn authorize(&self, path: &str, token: Option<&str>) -> Result<(), ApiError> {
        match &self.token {
            Some(expected) if token != Some(expected.as_str()) => {
                warn!("Rejected request to {} with a wrong token", path);
                Err(ApiError::Unauthorized)
            }
            _ => Ok(()),
        }
    }
}

/// Query of `/stock/symbol`.
#[derive(Debug, Deserialize)]
pub struct SymbolsQuery {
    exchange: Option<String>,
    token: Option<String>,
}

/// Query of `/quote`.
#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    symbol: Option<String>,
    token: Option<String>,
}

/// Assembles the API router.
pub fn router(ctx: Arc<MarketContext>) -> Router {
    Router::new()
        .route(SYMBOLS_PATH, get(list_symbols))
        .route(QUOTE_PATH, get(quote))
        .fallback(not_found)
        .with_state(ctx)
}

async fn list_symbols(
    State(ctx): State<Arc<MarketContext>>,
    Query(query): Query<SymbolsQuery>,
) -> Result<Json<Vec<Symbol>>, ApiError> {
    ctx.authorize(SYMBOLS_PATH, query.token.as_deref())?;
    let Some(exchange) = query.exchange.filter(|e| !e.trim().is_empty()) else {
        return Err(ApiError::BadRequest(String::from("exchange is required")));
    };
    let listed = if exchange.eq_ignore_ascii_case(EXCHANGE) {
        ctx.catalog.clone()
    } else {
        Vec::new()
    };
    debug!("Serving {} symbols for exchange {}", listed.len(), exchange);
    Ok(Json(listed))
}

async fn quote(
    State(ctx): State<Arc<MarketContext>>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<Quote>, ApiError> {
    ctx.authorize(QUOTE_PATH, query.token.as_deref())?;
    let Some(symbol) = query.symbol.filter(|s| !s.trim().is_empty()) else {
        return Err(ApiError::BadRequest(String::from("symbol is required")));
    };
    let quote = ctx
        .book
        .lock()
        .map_err(WatchlistError::from)?
        .quote(&symbol.to_ascii_uppercase());
    debug!("Serving quote for {}: {:.2}", symbol, quote.current_price);
    Ok(Json(quote))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app(token: Option<&str>) -> Router {
        router(Arc::new(MarketContext {
            catalog: catalog::symbols(),
            book: Arc::new(Mutex::new(PriceBook::open(catalog::reference_prices()))),
            token: token.map(String::from),
        }))
    }

    async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_quote(app: &Router, uri: &str) -> Quote {
        let (status, body) = send(app, "GET", uri).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn lists_catalog_for_us_only() {
        let app = app(None);
        let (status, body) = send(&app, "GET", "/stock/symbol?exchange=US").await;
        assert_eq!(status, StatusCode::OK);
        let symbols: Vec<Symbol> = serde_json::from_slice(&body).unwrap();
        assert_eq!(symbols, catalog::symbols());

        let (_, body) = send(&app, "GET", "/stock/symbol?exchange=TO").await;
        assert_eq!(body, b"[]");
    }

    #[tokio::test]
    async fn quotes_listed_symbol() {
        let quote = get_quote(&app(None), "/quote?symbol=aapl").await;
        assert!(quote.current_price > 0.0);
        assert!(quote.timestamp.is_some());
    }

    #[tokio::test]
    async fn enforces_token_when_configured() {
        let app = app(Some("sandbox"));
        let (status, body) = send(&app, "GET", "/quote?symbol=AAPL").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, br#"{"error":"Invalid API key"}"#);

        let (status, _) = send(&app, "GET", "/quote?symbol=AAPL&token=nope").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = send(&app, "GET", "/stock/symbol?exchange=US&token=sandbox").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn rejects_unknown_routes_missing_params_and_methods() {
        let app = app(None);
        let (status, body) = send(&app, "GET", "/news").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, br#"{"error":"not found"}"#);

        let (status, body) = send(&app, "GET", "/quote").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, br#"{"error":"symbol is required"}"#);

        let (status, _) = send(&app, "GET", "/stock/symbol?exchange=%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "POST", "/quote?symbol=AAPL").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn query_values_are_percent_decoded() {
        let app = app(None);
        assert!(get_quote(&app, "/quote?symbol=BRK%2Eb").await.current_price > 0.0);

        // A broken escape stays literal instead of turning into a control byte.
        let quote = get_quote(&app, "/quote?symbol=%+1").await;
        assert_eq!(quote.current_price, 0.0);

        // Invalid UTF-8 still gets a response.
        let quote = get_quote(&app, "/quote?symbol=%FF").await;
        assert_eq!(quote.current_price, 0.0);
    }
}
