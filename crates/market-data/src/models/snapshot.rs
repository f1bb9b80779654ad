use serde::Serialize;

use super::types::Ticker;
use crate::errors::MarketDataError;

/// Broader point-in-time view of a symbol.
///
/// Unknown fields serialize as `null` rather than being dropped, so every
/// provider produces the same shape.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub symbol: Ticker,
    pub current_price: f64,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub previous_close: Option<f64>,
    /// Shares traded in the latest session
    pub volume: Option<u64>,
    #[serde(rename = "week52High")]
    pub week_52_high: Option<f64>,
    #[serde(rename = "week52Low")]
    pub week_52_low: Option<f64>,
    pub pe_ratio: Option<f64>,
    /// Absolute value in `currency` units
    pub market_cap: Option<f64>,
    pub currency: Option<String>,
    pub source: String,
}

impl MarketSnapshot {
    /// Snapshot with only the required fields set.
    pub fn new(symbol: Ticker, current_price: f64, source: impl Into<String>) -> Self {
        Self {
            symbol,
            current_price,
            open: None,
            high: None,
            low: None,
            previous_close: None,
            volume: None,
            week_52_high: None,
            week_52_low: None,
            pe_ratio: None,
            market_cap: None,
            currency: None,
            source: source.into(),
        }
    }
}

/// Per-query result of a multi-symbol snapshot request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotOutcome {
    pub query: String,
    pub snapshot: Option<MarketSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<MarketDataError>,
}

impl SnapshotOutcome {
    pub fn from_result(
        query: impl Into<String>,
        result: Result<MarketSnapshot, MarketDataError>,
    ) -> Self {
        let query = query.into();
        match result {
            Ok(snapshot) => Self {
                query,
                snapshot: Some(snapshot),
                error: None,
            },
            Err(error) => Self {
                query,
                snapshot: None,
                error: Some(error),
            },
        }
    }
}
