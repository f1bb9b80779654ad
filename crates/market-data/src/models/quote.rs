use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::Ticker;
use crate::errors::MarketDataError;
use crate::metrics::week_over_week_change;

/// One OHLCV bar, normalized across providers.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    /// Canonical ticker (not the provider-specific spelling)
    pub symbol: Ticker,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Not every endpoint reports volume (Finnhub `/quote` does not)
    pub volume: Option<u64>,
    /// Trading date of the bar
    pub as_of_date: NaiveDate,
    /// Provider id (YAHOO, FINNHUB, ALPHA_VANTAGE, ...)
    pub source: String,
}

/// Bar width for price history requests.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    #[default]
    Daily,
    Weekly,
}

impl Interval {
    /// Calendar days of history requested for this interval:
    /// one month of daily bars or six months of weekly bars.
    pub fn lookback_days(self) -> i64 {
        match self {
            Self::Daily => 30,
            Self::Weekly => 182,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" | "1d" => Ok(Self::Daily),
            "weekly" | "week" | "1wk" => Ok(Self::Weekly),
            other => Err(MarketDataError::InvalidInput {
                message: format!("Unknown interval '{}'", other),
            }),
        }
    }
}

/// A series of bars plus the week-over-week change derived from it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistory {
    pub symbol: Ticker,
    pub interval: Interval,
    /// Ascending by date
    pub bars: Vec<QuoteRecord>,
    /// Percent; `None` when fewer than five bars are available
    pub week_over_week_change: Option<f64>,
    pub source: String,
}

impl PriceHistory {
    /// Sorts `bars` by date and derives the week-over-week change.
    pub fn new(
        symbol: Ticker,
        interval: Interval,
        mut bars: Vec<QuoteRecord>,
        source: impl Into<String>,
    ) -> Self {
        bars.sort_by_key(|bar| bar.as_of_date);
        let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
        Self {
            symbol,
            interval,
            week_over_week_change: week_over_week_change(&closes),
            bars,
            source: source.into(),
        }
    }

    pub fn latest(&self) -> Option<&QuoteRecord> {
        self.bars.last()
    }
}

/// Latest daily and weekly bars for one company.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockReport {
    pub symbol: Ticker,
    /// Free text the caller asked about
    pub company: String,
    pub daily: Option<QuoteRecord>,
    pub weekly: Option<QuoteRecord>,
}
