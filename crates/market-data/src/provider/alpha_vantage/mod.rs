//! Alpha Vantage market data provider implementation.
//!
//! This module provides market data from Alpha Vantage API:
//! - Latest quote via GLOBAL_QUOTE
//! - Snapshot via GLOBAL_QUOTE plus OVERVIEW
//! - Daily and weekly bars via TIME_SERIES_DAILY / TIME_SERIES_WEEKLY
//!
//! Every numeric field arrives as a string ("123.45", "None", "-").
//!
//! Note: Alpha Vantage free tier is limited to 5 API calls per minute.
//! Throttling is reported in a 200 body ("Note" / "Information").

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate};
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{lenient_f64, lenient_u64, Interval, MarketSnapshot, QuoteRecord};
use crate::provider::http::{build_client, parse_json, read_body, transport_error};
use crate::provider::{MarketDataProvider, ProviderCapabilities};

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER_ID: &str = "ALPHA_VANTAGE";

/// Alpha Vantage market data provider.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
}

// ============================================================================
// Response structures for Alpha Vantage API
// ============================================================================

/// API-level notices that Alpha Vantage puts in an otherwise normal body.
#[derive(Debug, Default, Deserialize)]
struct Notices {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

impl Notices {
    /// "Error Message" means the symbol or call was rejected; "Note" and
    /// "Information" are throttling notices.
    fn check(&self, symbol: &str) -> Result<(), MarketDataError> {
        if let Some(ref msg) = self.error_message {
            debug!("Alpha Vantage error for {}: {}", symbol, msg);
            return Err(MarketDataError::SymbolNotFound {
                provider: PROVIDER_ID.to_string(),
                symbol: symbol.to_string(),
            });
        }

        if let Some(msg) = self.note.as_ref().or(self.information.as_ref()) {
            warn!("Alpha Vantage notice: {}", msg);
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        Ok(())
    }
}

/// GLOBAL_QUOTE response
#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
    #[serde(flatten)]
    notices: Notices,
}

#[derive(Debug, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "02. open", default, deserialize_with = "lenient_f64")]
    open: Option<f64>,
    #[serde(rename = "03. high", default, deserialize_with = "lenient_f64")]
    high: Option<f64>,
    #[serde(rename = "04. low", default, deserialize_with = "lenient_f64")]
    low: Option<f64>,
    #[serde(rename = "05. price", default, deserialize_with = "lenient_f64")]
    price: Option<f64>,
    #[serde(rename = "06. volume", default, deserialize_with = "lenient_u64")]
    volume: Option<u64>,
    #[serde(rename = "07. latest trading day")]
    latest_trading_day: Option<String>,
    #[serde(rename = "08. previous close", default, deserialize_with = "lenient_f64")]
    previous_close: Option<f64>,
}

/// OVERVIEW response; an unknown symbol comes back as `{}`
#[derive(Debug, Default, Deserialize)]
struct OverviewResponse {
    #[serde(rename = "Currency")]
    currency: Option<String>,
    #[serde(rename = "MarketCapitalization", default, deserialize_with = "lenient_f64")]
    market_capitalization: Option<f64>,
    #[serde(rename = "PERatio", default, deserialize_with = "lenient_f64")]
    pe_ratio: Option<f64>,
    #[serde(rename = "52WeekHigh", default, deserialize_with = "lenient_f64")]
    week_52_high: Option<f64>,
    #[serde(rename = "52WeekLow", default, deserialize_with = "lenient_f64")]
    week_52_low: Option<f64>,
    #[serde(flatten)]
    notices: Notices,
}

/// TIME_SERIES_DAILY / TIME_SERIES_WEEKLY response
#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)", alias = "Weekly Time Series")]
    time_series: Option<HashMap<String, SeriesBar>>,
    #[serde(flatten)]
    notices: Notices,
}

#[derive(Debug, Deserialize)]
struct SeriesBar {
    #[serde(rename = "1. open", default, deserialize_with = "lenient_f64")]
    open: Option<f64>,
    #[serde(rename = "2. high", default, deserialize_with = "lenient_f64")]
    high: Option<f64>,
    #[serde(rename = "3. low", default, deserialize_with = "lenient_f64")]
    low: Option<f64>,
    #[serde(rename = "4. close", default, deserialize_with = "lenient_f64")]
    close: Option<f64>,
    #[serde(rename = "5. volume", default, deserialize_with = "lenient_u64")]
    volume: Option<u64>,
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a date string in YYYY-MM-DD format.
fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").ok()
}

fn parse_global_quote(
    symbol: &str,
    body: &str,
) -> Result<(QuoteRecord, Option<f64>), MarketDataError> {
    let response: GlobalQuoteResponse = parse_json(PROVIDER_ID, "global quote", body)?;
    response.notices.check(symbol)?;

    // Unknown symbols come back as an empty "Global Quote" object
    let quote = response.global_quote.ok_or_else(|| MarketDataError::SymbolNotFound {
        provider: PROVIDER_ID.to_string(),
        symbol: symbol.to_string(),
    })?;
    let close = match quote.price {
        Some(price) => price,
        None if quote.latest_trading_day.is_none() => {
            return Err(MarketDataError::SymbolNotFound {
                provider: PROVIDER_ID.to_string(),
                symbol: symbol.to_string(),
            })
        }
        None => {
            return Err(MarketDataError::provider_error(
                PROVIDER_ID,
                format!("Quote for {} has no price", symbol),
            ))
        }
    };

    let as_of_date = quote
        .latest_trading_day
        .as_deref()
        .and_then(parse_date)
        .ok_or_else(|| {
            MarketDataError::provider_error(
                PROVIDER_ID,
                format!("Quote for {} has no trading day", symbol),
            )
        })?;

    let record = QuoteRecord {
        symbol: Arc::from(symbol),
        open: quote.open.unwrap_or(close),
        high: quote.high.unwrap_or(close),
        low: quote.low.unwrap_or(close),
        close,
        volume: quote.volume,
        as_of_date,
        source: PROVIDER_ID.to_string(),
    };
    Ok((record, quote.previous_close))
}

/// Bars within `interval.lookback_days()` of the newest bar.
fn parse_time_series(
    symbol: &str,
    interval: Interval,
    body: &str,
) -> Result<Vec<QuoteRecord>, MarketDataError> {
    let response: TimeSeriesResponse = parse_json(PROVIDER_ID, "time series", body)?;
    response.notices.check(symbol)?;

    let series = response.time_series.ok_or_else(|| {
        MarketDataError::provider_error(PROVIDER_ID, "No time series data in response")
    })?;

    let mut bars: Vec<QuoteRecord> = series
        .into_iter()
        .filter_map(|(date_str, bar)| {
            let as_of_date = parse_date(&date_str)?;
            let close = bar.close?;
            Some(QuoteRecord {
                symbol: Arc::from(symbol),
                open: bar.open.unwrap_or(close),
                high: bar.high.unwrap_or(close),
                low: bar.low.unwrap_or(close),
                close,
                volume: bar.volume,
                as_of_date,
                source: PROVIDER_ID.to_string(),
            })
        })
        .collect();

    let newest = bars
        .iter()
        .map(|bar| bar.as_of_date)
        .max()
        .ok_or_else(|| MarketDataError::NoDataForRange {
            provider: PROVIDER_ID.to_string(),
        })?;
    let cutoff = newest - ChronoDuration::days(interval.lookback_days());
    bars.retain(|bar| bar.as_of_date >= cutoff);
    bars.sort_by_key(|bar| bar.as_of_date);

    Ok(bars)
}

fn parse_overview(symbol: &str, body: &str) -> Result<OverviewResponse, MarketDataError> {
    let response: OverviewResponse = parse_json(PROVIDER_ID, "overview", body)?;
    response.notices.check(symbol)?;
    Ok(response)
}

fn build_snapshot(
    symbol: &str,
    quote: QuoteRecord,
    previous_close: Option<f64>,
    overview: OverviewResponse,
) -> MarketSnapshot {
    MarketSnapshot {
        open: Some(quote.open),
        high: Some(quote.high),
        low: Some(quote.low),
        previous_close,
        volume: quote.volume,
        week_52_high: overview.week_52_high,
        week_52_low: overview.week_52_low,
        pe_ratio: overview.pe_ratio,
        market_cap: overview.market_capitalization,
        currency: overview.currency,
        ..MarketSnapshot::new(Arc::from(symbol), quote.close, PROVIDER_ID)
    }
}

impl AlphaVantageProvider {
    /// Create a new Alpha Vantage provider.
    pub fn new(api_key: String) -> Self {
        Self {
            client: build_client(),
            api_key,
        }
    }

    /// Make a request to the Alpha Vantage API.
    async fn fetch(&self, params: &[(&str, &str)]) -> Result<String, MarketDataError> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("apikey", self.api_key.as_str()));

        let url = reqwest::Url::parse_with_params(BASE_URL, &all_params).map_err(|e| {
            MarketDataError::provider_error(PROVIDER_ID, format!("Failed to build URL: {}", e))
        })?;

        debug!(
            "Alpha Vantage request: {}",
            url.as_str().replace(&self.api_key, "***")
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_ID, e))?;

        read_body(PROVIDER_ID, response).await
    }

    async fn fetch_global_quote(
        &self,
        symbol: &str,
    ) -> Result<(QuoteRecord, Option<f64>), MarketDataError> {
        let body = self
            .fetch(&[("function", "GLOBAL_QUOTE"), ("symbol", symbol)])
            .await?;
        parse_global_quote(symbol, &body)
    }

    async fn fetch_overview(&self, symbol: &str) -> Result<OverviewResponse, MarketDataError> {
        let body = self
            .fetch(&[("function", "OVERVIEW"), ("symbol", symbol)])
            .await?;
        parse_overview(symbol, &body)
    }
}

// ============================================================================
// MarketDataProvider trait implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        // Lowest priority due to rate limits
        3
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::ALL
    }

    async fn get_quote(&self, symbol: &str) -> Result<QuoteRecord, MarketDataError> {
        debug!("Fetching latest quote for {} from Alpha Vantage", symbol);
        self.fetch_global_quote(symbol).await.map(|(record, _)| record)
    }

    async fn get_snapshot(&self, symbol: &str) -> Result<MarketSnapshot, MarketDataError> {
        debug!("Fetching snapshot for {} from Alpha Vantage", symbol);
        let (quote, previous_close) = self.fetch_global_quote(symbol).await?;

        // Sequential: the free tier rejects bursts
        let overview = match self.fetch_overview(symbol).await {
            Ok(overview) => overview,
            Err(e) => {
                warn!("Alpha Vantage overview unavailable for {}: {}", symbol, e);
                OverviewResponse::default()
            }
        };

        Ok(build_snapshot(symbol, quote, previous_close, overview))
    }

    async fn get_history(
        &self,
        symbol: &str,
        interval: Interval,
    ) -> Result<Vec<QuoteRecord>, MarketDataError> {
        let function = match interval {
            Interval::Daily => "TIME_SERIES_DAILY",
            Interval::Weekly => "TIME_SERIES_WEEKLY",
        };
        let body = self
            .fetch(&[("function", function), ("symbol", symbol)])
            .await?;
        let bars = parse_time_series(symbol, interval, &body)?;

        debug!(
            "Alpha Vantage: fetched {} {} bars for {}",
            bars.len(),
            interval,
            symbol
        );
        Ok(bars)
    }
}
