//! Quote payload served by the `/quote` endpoint.
//!
//! The provider uses single-letter field names; they are mapped onto descriptive
//! names here so the rest of the workspace never sees `c`/`dp`/`pc`.
use serde::{Deserialize, Serialize};

/// Point-in-time price snapshot for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Last traded price.
    #[serde(rename = "c")]
    pub current_price: f64,
    /// Absolute change against the previous close.
    #[serde(rename = "d")]
    pub change: f64,
    /// Percentage change against the previous close.
    #[serde(rename = "dp")]
    pub change_percent: f64,
    /// Session high.
    #[serde(rename = "h")]
    pub high: f64,
    /// Session low.
    #[serde(rename = "l")]
    pub low: f64,
    /// Session open.
    #[serde(rename = "o")]
    pub open: f64,
    /// Previous session close.
    #[serde(rename = "pc")]
    pub previous_close: f64,
    /// UNIX seconds of the snapshot, when the provider sends one.
    #[serde(rename = "t", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl Quote {
    /// Returns `true` when the change is non-negative.
    pub fn is_up(&self) -> bool {
        self.change >= 0.0
    }

    /// Encode the quote to JSON bytes.
    pub fn to_json_bytes(&self) -> crate::Result<Vec<u8>> {
        let json = serde_json::to_vec(self)?;
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_short_field_names() {
        let body = r#"{"c":261.74,"d":-1.2,"dp":-0.456,"h":263.31,"l":260.68,"o":261.07,"pc":262.94,"t":1700000000}"#;
        let quote: Quote = serde_json::from_str(body).unwrap();
        assert_eq!(quote.current_price, 261.74);
        assert_eq!(quote.change_percent, -0.456);
        assert_eq!(quote.previous_close, 262.94);
        assert_eq!(quote.timestamp, Some(1_700_000_000));
        assert!(!quote.is_up());
    }

    #[test]
    fn timestamp_is_optional() {
        let body = r#"{"c":1,"d":0,"dp":0,"h":1,"l":1,"o":1,"pc":1}"#;
        let quote: Quote = serde_json::from_str(body).unwrap();
        assert_eq!(quote.timestamp, None);
        assert!(quote.is_up());
    }

    #[test]
    fn rejects_non_numeric_price() {
        assert!(serde_json::from_str::<Quote>(r#"{"c": "not-a-number"}"#).is_err());
    }
}
