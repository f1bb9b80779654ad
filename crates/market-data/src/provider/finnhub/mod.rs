//! Finnhub market data provider implementation.
//!
//! This module provides market data from Finnhub API:
//! - Latest quote via /quote (no volume on this endpoint)
//! - Snapshot via /quote plus /stock/metric (52-week range, P/E, market cap)
//! - Daily and weekly bars via /stock/candle
//!
//! Finnhub free tier is limited to 60 API calls per minute.
//! API documentation: https://finnhub.io/docs/api

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{f64_to_u64, lenient_f64, Interval, MarketSnapshot, QuoteRecord};
use crate::provider::http::{build_client, parse_json, read_body, transport_error};
use crate::provider::{MarketDataProvider, ProviderCapabilities};

const BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_ID: &str = "FINNHUB";

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /quote endpoint
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Current price
    #[serde(default, deserialize_with = "lenient_f64")]
    c: Option<f64>,
    /// High price of the day
    #[serde(default, deserialize_with = "lenient_f64")]
    h: Option<f64>,
    /// Low price of the day
    #[serde(default, deserialize_with = "lenient_f64")]
    l: Option<f64>,
    /// Open price of the day
    #[serde(default, deserialize_with = "lenient_f64")]
    o: Option<f64>,
    /// Previous close
    #[serde(default, deserialize_with = "lenient_f64")]
    pc: Option<f64>,
    /// Timestamp (Unix)
    t: Option<i64>,
}

/// Response from /stock/candle endpoint
#[derive(Debug, Deserialize)]
struct CandleResponse {
    /// Status: "ok" or "no_data"
    s: String,
    #[serde(default)]
    c: Vec<f64>,
    #[serde(default)]
    h: Vec<f64>,
    #[serde(default)]
    l: Vec<f64>,
    #[serde(default)]
    o: Vec<f64>,
    #[serde(default)]
    v: Vec<f64>,
    #[serde(default)]
    t: Vec<i64>,
}

/// Response from /stock/metric?metric=all
#[derive(Debug, Default, Deserialize)]
struct MetricResponse {
    #[serde(default)]
    metric: Metrics,
}

#[derive(Debug, Default, Deserialize)]
struct Metrics {
    #[serde(rename = "52WeekHigh", default, deserialize_with = "lenient_f64")]
    week_52_high: Option<f64>,
    #[serde(rename = "52WeekLow", default, deserialize_with = "lenient_f64")]
    week_52_low: Option<f64>,
    #[serde(rename = "peBasicExclExtraTTM", default, deserialize_with = "lenient_f64")]
    pe_ratio: Option<f64>,
    /// In millions
    #[serde(rename = "marketCapitalization", default, deserialize_with = "lenient_f64")]
    market_capitalization: Option<f64>,
}

/// Error response from Finnhub
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

// ============================================================================
// Parsing
// ============================================================================

fn parse_quote(symbol: &str, body: &str) -> Result<(QuoteResponse, f64), MarketDataError> {
    let response: QuoteResponse = parse_json(PROVIDER_ID, "quote", body)?;

    // Finnhub returns zeros for unknown symbols instead of an error
    let close = response.c.filter(|c| *c != 0.0).ok_or_else(|| {
        MarketDataError::SymbolNotFound {
            provider: PROVIDER_ID.to_string(),
            symbol: symbol.to_string(),
        }
    })?;

    Ok((response, close))
}

fn quote_to_record(symbol: &str, response: &QuoteResponse, close: f64) -> QuoteRecord {
    let as_of_date = response
        .t
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
        .unwrap_or_else(Utc::now)
        .date_naive();

    QuoteRecord {
        symbol: Arc::from(symbol),
        open: response.o.unwrap_or(close),
        high: response.h.unwrap_or(close),
        low: response.l.unwrap_or(close),
        close,
        volume: None,
        as_of_date,
        source: PROVIDER_ID.to_string(),
    }
}

fn parse_candles(symbol: &str, body: &str) -> Result<Vec<QuoteRecord>, MarketDataError> {
    let response: CandleResponse = parse_json(PROVIDER_ID, "candle", body)?;

    if response.s == "no_data" {
        return Err(MarketDataError::NoDataForRange {
            provider: PROVIDER_ID.to_string(),
        });
    }

    if response.s != "ok" {
        return Err(MarketDataError::provider_error(
            PROVIDER_ID,
            format!("Unexpected candle status: {}", response.s),
        ));
    }

    let len = response.t.len();
    if response.c.len() != len
        || response.o.len() != len
        || response.h.len() != len
        || response.l.len() != len
    {
        return Err(MarketDataError::provider_error(
            PROVIDER_ID,
            "Mismatched array lengths in candle response",
        ));
    }

    let mut bars = Vec::with_capacity(len);
    for i in 0..len {
        let as_of_date: NaiveDate = match Utc.timestamp_opt(response.t[i], 0).single() {
            Some(ts) => ts.date_naive(),
            None => {
                warn!("Invalid timestamp at index {}: {}", i, response.t[i]);
                continue;
            }
        };

        bars.push(QuoteRecord {
            symbol: Arc::from(symbol),
            open: response.o[i],
            high: response.h[i],
            low: response.l[i],
            close: response.c[i],
            volume: response.v.get(i).copied().and_then(f64_to_u64),
            as_of_date,
            source: PROVIDER_ID.to_string(),
        });
    }

    if bars.is_empty() {
        return Err(MarketDataError::NoDataForRange {
            provider: PROVIDER_ID.to_string(),
        });
    }

    Ok(bars)
}

// ============================================================================
// FinnhubProvider
// ============================================================================

/// Finnhub market data provider.
pub struct FinnhubProvider {
    client: Client,
    api_key: String,
}

impl FinnhubProvider {
    /// Create a new Finnhub provider with the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            client: build_client(),
            api_key,
        }
    }

    /// Make a GET request to the Finnhub API.
    async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<String, MarketDataError> {
        let url = format!("{}{}", BASE_URL, endpoint);

        debug!("Finnhub request: {} with {} params", endpoint, params.len());

        // API key as header keeps it out of URLs and logs
        let response = self
            .client
            .get(&url)
            .header("X-Finnhub-Token", &self.api_key)
            .query(params)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_ID, e))?;

        let body = read_body(PROVIDER_ID, response).await?;

        // Finnhub sometimes reports errors in a 200 body
        if let Ok(ErrorResponse { error: Some(message) }) =
            serde_json::from_str::<ErrorResponse>(&body)
        {
            return Err(MarketDataError::provider_error(PROVIDER_ID, message));
        }

        Ok(body)
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<(QuoteResponse, f64), MarketDataError> {
        let body = self.fetch("/quote", &[("symbol", symbol)]).await?;
        parse_quote(symbol, &body)
    }

    async fn fetch_metrics(&self, symbol: &str) -> Result<Metrics, MarketDataError> {
        let body = self
            .fetch("/stock/metric", &[("symbol", symbol), ("metric", "all")])
            .await?;
        let response: MetricResponse = parse_json(PROVIDER_ID, "metric", &body)?;
        Ok(response.metric)
    }
}

#[async_trait]
impl MarketDataProvider for FinnhubProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        2
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::ALL
    }

    async fn get_quote(&self, symbol: &str) -> Result<QuoteRecord, MarketDataError> {
        debug!("Fetching latest quote for {} from Finnhub", symbol);
        let (response, close) = self.fetch_quote(symbol).await?;
        Ok(quote_to_record(symbol, &response, close))
    }

    async fn get_snapshot(&self, symbol: &str) -> Result<MarketSnapshot, MarketDataError> {
        debug!("Fetching snapshot for {} from Finnhub", symbol);
        let (quote, metrics) =
            futures::join!(self.fetch_quote(symbol), self.fetch_metrics(symbol));
        let (response, close) = quote?;

        // Valuation fields are optional; a failed metric call leaves them empty
        let metrics = metrics.unwrap_or_else(|e| {
            warn!("Finnhub metrics unavailable for {}: {}", symbol, e);
            Metrics::default()
        });

        Ok(build_snapshot(symbol, &response, close, metrics))
    }

    async fn get_history(
        &self,
        symbol: &str,
        interval: Interval,
    ) -> Result<Vec<QuoteRecord>, MarketDataError> {
        let end = Utc::now();
        let start = end - ChronoDuration::days(interval.lookback_days());
        let from_ts = start.timestamp().to_string();
        let to_ts = end.timestamp().to_string();
        let resolution = match interval {
            Interval::Daily => "D",
            Interval::Weekly => "W",
        };

        let body = self
            .fetch(
                "/stock/candle",
                &[
                    ("symbol", symbol),
                    ("resolution", resolution),
                    ("from", from_ts.as_str()),
                    ("to", to_ts.as_str()),
                ],
            )
            .await?;

        let bars = parse_candles(symbol, &body)?;
        debug!(
            "Finnhub: fetched {} {} bars for {}",
            bars.len(),
            interval,
            symbol
        );
        Ok(bars)
    }
}

fn build_snapshot(
    symbol: &str,
    response: &QuoteResponse,
    close: f64,
    metrics: Metrics,
) -> MarketSnapshot {
    MarketSnapshot {
        open: response.o,
        high: response.h,
        low: response.l,
        previous_close: response.pc,
        week_52_high: metrics.week_52_high,
        week_52_low: metrics.week_52_low,
        pe_ratio: metrics.pe_ratio,
        market_cap: metrics.market_capitalization.map(|mc| mc * 1_000_000.0),
        ..MarketSnapshot::new(Arc::from(symbol), close, PROVIDER_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id() {
        let provider = FinnhubProvider::new("test_key".to_string());
        assert_eq!(provider.id(), "FINNHUB");
        assert_eq!(provider.priority(), 2);
    }

    #[test]
    fn test_quote_response_parsing() {
        let json = r#"{
            "c": 261.74,
            "d": 1.17,
            "dp": 0.449,
            "h": 263.31,
            "l": 260.68,
            "o": 261.07,
            "pc": 260.57,
            "t": 1710532800
        }"#;

        let (response, close) = parse_quote("AAPL", json).unwrap();
        let record = quote_to_record("AAPL", &response, close);
        assert_eq!(record.close, 261.74);
        assert_eq!(record.high, 263.31);
        assert_eq!(record.volume, None);
        assert_eq!(record.as_of_date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(record.source, "FINNHUB");
    }

    #[test]
    fn test_unknown_symbol_returns_zeros() {
        let json = r#"{"c":0,"d":null,"dp":null,"h":0,"l":0,"o":0,"pc":0,"t":0}"#;
        match parse_quote("NOPE", json) {
            Err(MarketDataError::SymbolNotFound { provider, symbol }) => {
                assert_eq!(provider, "FINNHUB");
                assert_eq!(symbol, "NOPE");
            }
            other => panic!("Expected SymbolNotFound, got {:?}", other.map(|(_, c)| c)),
        }
    }

    #[test]
    fn test_candle_response_parsing() {
        let json = r#"{
            "s": "ok",
            "c": [100.0, 101.5],
            "h": [102.0, 103.0],
            "l": [99.0, 100.5],
            "o": [99.5, 100.0],
            "v": [1500000, 1750000.0],
            "t": [1710115200, 1710201600]
        }"#;

        let bars = parse_candles("MSFT", json).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].close, 101.5);
        assert_eq!(bars[0].volume, Some(1_500_000));
        assert_eq!(
            bars[0].as_of_date,
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
        );
    }

    #[test]
    fn test_candle_response_no_data() {
        let result = parse_candles("MSFT", r#"{"s": "no_data"}"#);
        assert!(matches!(
            result,
            Err(MarketDataError::NoDataForRange { .. })
        ));
    }

    #[test]
    fn test_candle_mismatched_lengths() {
        let json = r#"{"s":"ok","c":[1.0],"h":[],"l":[1.0],"o":[1.0],"v":[],"t":[1710115200]}"#;
        assert!(matches!(
            parse_candles("MSFT", json),
            Err(MarketDataError::ProviderError { .. })
        ));
    }

    #[test]
    fn test_snapshot_scales_market_cap() {
        let quote = r#"{"c": 189.5, "h": 190.0, "l": 187.2, "o": 188.0, "pc": 188.4, "t": 1710532800}"#;
        let metric = r#"{
            "metric": {
                "52WeekHigh": 199.62,
                "52WeekLow": "164.08",
                "peBasicExclExtraTTM": 29.4,
                "marketCapitalization": 2950000.5
            },
            "series": {}
        }"#;

        let (response, close) = parse_quote("AAPL", quote).unwrap();
        let metrics: MetricResponse = parse_json(PROVIDER_ID, "metric", metric).unwrap();
        let snapshot = build_snapshot("AAPL", &response, close, metrics.metric);

        assert_eq!(snapshot.current_price, 189.5);
        assert_eq!(snapshot.previous_close, Some(188.4));
        // /quote carries no volume
        assert_eq!(snapshot.volume, None);
        assert_eq!(snapshot.week_52_low, Some(164.08));
        assert_eq!(snapshot.pe_ratio, Some(29.4));
        assert_eq!(snapshot.market_cap, Some(2_950_000.5 * 1_000_000.0));
    }

    #[test]
    fn test_metrics_missing_fields() {
        let metrics: MetricResponse =
            parse_json(PROVIDER_ID, "metric", r#"{"metric": {}}"#).unwrap();
        assert_eq!(metrics.metric.week_52_high, None);
        assert_eq!(metrics.metric.market_capitalization, None);
    }
}
