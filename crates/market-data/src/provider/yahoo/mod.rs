//! Yahoo Finance market data provider.
//!
//! Keyless provider backed by the `yahoo_finance_api` chart endpoint:
//! - Latest quote from the most recent daily bar
//! - Snapshot derived from one year of daily bars (52-week range,
//!   previous close); valuation fields are not available here
//! - Daily (1mo) and weekly (6mo) bars

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{Interval, MarketSnapshot, QuoteRecord};
use crate::provider::http::REQUEST_TIMEOUT;
use crate::provider::{MarketDataProvider, ProviderCapabilities};

const PROVIDER_ID: &str = "YAHOO";

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, MarketDataError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| {
            MarketDataError::provider_error(
                PROVIDER_ID,
                format!("Failed to initialize Yahoo connector: {}", e),
            )
        })?;
        Ok(Self { connector })
    }

    /// Run a connector call under the shared request timeout.
    async fn call<F>(&self, symbol: &str, fut: F) -> Result<yahoo::YResponse, MarketDataError>
    where
        F: Future<Output = Result<yahoo::YResponse, yahoo::YahooError>>,
    {
        match tokio::time::timeout(REQUEST_TIMEOUT, fut).await {
            Err(_) => Err(MarketDataError::Transport {
                provider: PROVIDER_ID.to_string(),
                message: "Request timed out".to_string(),
            }),
            Ok(Err(e)) => Err(map_yahoo_error(symbol, e)),
            Ok(Ok(response)) => Ok(response),
        }
    }

    /// Fetch bars for a `(interval, range)` pair of chart parameters.
    async fn fetch_range(
        &self,
        symbol: &str,
        interval: &str,
        range: &str,
    ) -> Result<Vec<QuoteRecord>, MarketDataError> {
        let response = self
            .call(symbol, self.connector.get_quote_range(symbol, interval, range))
            .await?;

        let quotes = response.quotes().map_err(|e| map_yahoo_error(symbol, e))?;
        let bars: Vec<QuoteRecord> = quotes
            .iter()
            .filter_map(|q| {
                bar_to_record(
                    symbol,
                    q.timestamp as i64,
                    [q.open, q.high, q.low, q.close],
                    q.volume,
                )
            })
            .collect();

        if bars.is_empty() {
            warn!(
                "No usable {} bars returned for '{}' over {}",
                interval, symbol, range
            );
            return Err(MarketDataError::NoDataForRange {
                provider: PROVIDER_ID.to_string(),
            });
        }

        Ok(bars)
    }
}

fn map_yahoo_error(symbol: &str, error: yahoo::YahooError) -> MarketDataError {
    if matches!(error, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
        MarketDataError::SymbolNotFound {
            provider: PROVIDER_ID.to_string(),
            symbol: symbol.to_string(),
        }
    } else {
        MarketDataError::provider_error(PROVIDER_ID, error.to_string())
    }
}

/// Convert one chart bar; bars with a missing (NaN) or non-positive close are skipped.
fn bar_to_record(
    symbol: &str,
    timestamp: i64,
    [open, high, low, close]: [f64; 4],
    volume: u64,
) -> Option<QuoteRecord> {
    if !close.is_finite() || close <= 0.0 {
        return None;
    }
    let as_of_date = Utc.timestamp_opt(timestamp, 0).single()?.date_naive();
    let or_close = |v: f64| if v.is_finite() { v } else { close };

    Some(QuoteRecord {
        symbol: Arc::from(symbol),
        open: or_close(open),
        high: or_close(high),
        low: or_close(low),
        close,
        volume: Some(volume),
        as_of_date,
        source: PROVIDER_ID.to_string(),
    })
}

/// Build a snapshot from ascending daily bars covering about a year.
fn snapshot_from_bars(symbol: &str, bars: &[QuoteRecord]) -> Option<MarketSnapshot> {
    let latest = bars.last()?;
    let week_52_high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let week_52_low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let previous_close = bars.len().checked_sub(2).map(|i| bars[i].close);

    Some(MarketSnapshot {
        open: Some(latest.open),
        high: Some(latest.high),
        low: Some(latest.low),
        previous_close,
        volume: latest.volume,
        week_52_high: Some(week_52_high),
        week_52_low: Some(week_52_low),
        ..MarketSnapshot::new(Arc::from(symbol), latest.close, PROVIDER_ID)
    })
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        1
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::ALL
    }

    async fn get_quote(&self, symbol: &str) -> Result<QuoteRecord, MarketDataError> {
        debug!("Fetching latest quote for {} from Yahoo", symbol);

        let response = self
            .call(symbol, self.connector.get_latest_quotes(symbol, "1d"))
            .await?;
        let quote = response.last_quote().map_err(|e| {
            warn!("No quotes returned for {}: {}", symbol, e);
            map_yahoo_error(symbol, e)
        })?;

        bar_to_record(
            symbol,
            quote.timestamp as i64,
            [quote.open, quote.high, quote.low, quote.close],
            quote.volume,
        )
        .ok_or_else(|| {
            MarketDataError::provider_error(PROVIDER_ID, format!("Quote for {} has no close", symbol))
        })
    }

    async fn get_snapshot(&self, symbol: &str) -> Result<MarketSnapshot, MarketDataError> {
        debug!("Fetching snapshot for {} from Yahoo", symbol);

        let mut bars = self.fetch_range(symbol, "1d", "1y").await?;
        bars.sort_by_key(|bar| bar.as_of_date);

        snapshot_from_bars(symbol, &bars).ok_or_else(|| MarketDataError::NoDataForRange {
            provider: PROVIDER_ID.to_string(),
        })
    }

    async fn get_history(
        &self,
        symbol: &str,
        interval: Interval,
    ) -> Result<Vec<QuoteRecord>, MarketDataError> {
        let (yahoo_interval, range) = match interval {
            Interval::Daily => ("1d", "1mo"),
            Interval::Weekly => ("1wk", "6mo"),
        };
        debug!(
            "Fetching {} history for {} from Yahoo ({})",
            interval, symbol, range
        );
        self.fetch_range(symbol, yahoo_interval, range).await
    }
}
