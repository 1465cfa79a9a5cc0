//! Shared networking constants and helpers used by client and sandbox provider.

/// Public provider base URL.
pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";
/// Exchange whose catalog is listed by default.
pub const DEFAULT_EXCHANGE: &str = "US";
/// Path of the catalog endpoint, relative to the base URL.
pub const SYMBOLS_PATH: &str = "/stock/symbol";
/// Path of the quote endpoint, relative to the base URL.
pub const QUOTE_PATH: &str = "/quote";
/// Port the sandbox provider listens on by default.
pub const SANDBOX_PORT: u16 = 8090;

/// Helper to format an IPv4 address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}

/// Joins a base URL and an endpoint path without doubling the slash.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
