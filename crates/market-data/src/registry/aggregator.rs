//! Market data aggregator: one operation, an ordered chain of providers.
//!
//! For every request the aggregator:
//! 1. Rejects unresolved input with `ResolutionFailure` (no provider is called)
//! 2. Filters providers by operation capability
//! 3. Orders them by the configured provider order, then by default priority
//! 4. Calls each provider with its own spelling of the symbol
//! 5. Returns the first success, relabeled with the canonical ticker
//! 6. On failure, moves on according to the retry class and [`FallbackPolicy`]

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::diagnostics::{FetchDiagnostics, SkipReason};
use crate::errors::{MarketDataError, RetryClass};
use crate::models::{
    Interval, MarketSnapshot, PriceHistory, QuoteRecord, ResolutionSource, ResolvedSymbol,
    StockReport, Symbol,
};
use crate::provider::{MarketDataProvider, Operation};
use crate::resolver::SymbolValidator;

/// What a provider failure means for the rest of the chain.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackPolicy {
    /// Retryable failures move on to the next provider.
    #[default]
    NextProvider,
    /// The first provider failure is returned as-is.
    FailFast,
}

impl FromStr for FallbackPolicy {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "next-provider" | "next" | "fallback" => Ok(Self::NextProvider),
            "fail-fast" => Ok(Self::FailFast),
            other => Err(MarketDataError::InvalidInput {
                message: format!("Unknown fallback policy '{}'", other),
            }),
        }
    }
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NextProvider => "next-provider",
            Self::FailFast => "fail-fast",
        })
    }
}

/// Stateless over its providers: safe to share behind an `Arc`.
pub struct MarketDataAggregator {
    providers: Vec<Arc<dyn MarketDataProvider>>,
    /// Configured order (provider ids). Providers not listed go last, by priority.
    provider_order: Vec<String>,
    fallback: FallbackPolicy,
}

impl MarketDataAggregator {
    pub fn new(providers: Vec<Arc<dyn MarketDataProvider>>) -> Self {
        Self {
            providers,
            provider_order: Vec::new(),
            fallback: FallbackPolicy::default(),
        }
    }

    pub fn with_provider_order(mut self, order: Vec<String>) -> Self {
        self.provider_order = order
            .into_iter()
            .map(|id| id.trim().to_ascii_uppercase())
            .filter(|id| !id.is_empty())
            .collect();
        self
    }

    pub fn with_fallback_policy(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Get the list of registered providers.
    pub fn providers(&self) -> &[Arc<dyn MarketDataProvider>] {
        &self.providers
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Provider ids in the order they would be tried for `operation`.
    pub fn provider_chain(&self, operation: Operation) -> Vec<&'static str> {
        self.ordered_providers(operation, &mut FetchDiagnostics::new())
            .iter()
            .map(|p| p.id())
            .collect()
    }

    // ------------------------------------------------------------------
    // Quote
    // ------------------------------------------------------------------

    /// Latest daily bar for a resolved symbol.
    pub async fn get_quote(&self, symbol: &ResolvedSymbol) -> Result<QuoteRecord, MarketDataError> {
        self.get_quote_with_diagnostics(symbol).await.0
    }

    pub async fn get_quote_with_diagnostics(
        &self,
        symbol: &ResolvedSymbol,
    ) -> (Result<QuoteRecord, MarketDataError>, FetchDiagnostics) {
        let mut diagnostics = FetchDiagnostics::new();
        let result = match symbol.require() {
            Ok(symbol) => self
                .run_chain(symbol, Operation::Quote, &mut diagnostics, |p, s| async move {
                    p.get_quote(&s).await
                })
                .await
                .map(|(mut record, _)| {
                    record.symbol = symbol.ticker.clone();
                    record
                }),
            Err(e) => Err(e),
        };
        (result, diagnostics)
    }

    // ------------------------------------------------------------------
    // Snapshot
    // ------------------------------------------------------------------

    /// Point-in-time snapshot for a resolved symbol.
    pub async fn get_snapshot(
        &self,
        symbol: &ResolvedSymbol,
    ) -> Result<MarketSnapshot, MarketDataError> {
        self.get_snapshot_with_diagnostics(symbol).await.0
    }

    pub async fn get_snapshot_with_diagnostics(
        &self,
        symbol: &ResolvedSymbol,
    ) -> (Result<MarketSnapshot, MarketDataError>, FetchDiagnostics) {
        let mut diagnostics = FetchDiagnostics::new();
        let result = match symbol.require() {
            Ok(symbol) => self
                .run_chain(symbol, Operation::Snapshot, &mut diagnostics, |p, s| async move {
                    p.get_snapshot(&s).await
                })
                .await
                .map(|(mut snapshot, _)| {
                    snapshot.symbol = symbol.ticker.clone();
                    snapshot
                }),
            Err(e) => Err(e),
        };
        (result, diagnostics)
    }

    /// Snapshots for several symbols, fetched concurrently.
    ///
    /// Results are in input order; one symbol failing does not affect the others.
    pub async fn get_snapshots(
        &self,
        symbols: &[ResolvedSymbol],
    ) -> Vec<Result<MarketSnapshot, MarketDataError>> {
        join_all(symbols.iter().map(|symbol| self.get_snapshot(symbol))).await
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Bar series plus week-over-week change.
    pub async fn get_price_history(
        &self,
        symbol: &ResolvedSymbol,
        interval: Interval,
    ) -> Result<PriceHistory, MarketDataError> {
        self.get_price_history_with_diagnostics(symbol, interval)
            .await
            .0
    }

    pub async fn get_price_history_with_diagnostics(
        &self,
        symbol: &ResolvedSymbol,
        interval: Interval,
    ) -> (Result<PriceHistory, MarketDataError>, FetchDiagnostics) {
        let mut diagnostics = FetchDiagnostics::new();
        let result = match symbol.require() {
            Ok(symbol) => self
                .run_chain(symbol, Operation::History, &mut diagnostics, |p, s| async move {
                    match p.get_history(&s, interval).await {
                        Ok(bars) if bars.is_empty() => Err(MarketDataError::NoDataForRange {
                            provider: p.id().to_string(),
                        }),
                        other => other,
                    }
                })
                .await
                .map(|(mut bars, provider_id)| {
                    for bar in &mut bars {
                        bar.symbol = symbol.ticker.clone();
                    }
                    PriceHistory::new(symbol.ticker.clone(), interval, bars, provider_id)
                }),
            Err(e) => Err(e),
        };
        (result, diagnostics)
    }

    /// Latest daily and weekly bars, fetched concurrently.
    ///
    /// A failed half is `None`; if both fail the daily error is returned.
    pub async fn get_stock_report(
        &self,
        symbol: &ResolvedSymbol,
        company: &str,
    ) -> Result<StockReport, MarketDataError> {
        let resolved = symbol.require()?;
        let (daily, weekly) = futures::join!(
            self.get_price_history(symbol, Interval::Daily),
            self.get_price_history(symbol, Interval::Weekly)
        );

        let (daily, weekly) = match (daily, weekly) {
            (Err(daily_err), Err(weekly_err)) => {
                warn!(
                    "Stock report for {} failed: daily: {}, weekly: {}",
                    resolved.ticker, daily_err, weekly_err
                );
                return Err(daily_err);
            }
            (daily, weekly) => (
                latest_bar(daily, resolved, Interval::Daily),
                latest_bar(weekly, resolved, Interval::Weekly),
            ),
        };

        Ok(StockReport {
            symbol: resolved.ticker.clone(),
            company: company.trim().to_string(),
            daily,
            weekly,
        })
    }

    // ------------------------------------------------------------------
    // Chain
    // ------------------------------------------------------------------

    /// Get providers ordered by preference for `operation`, recording
    /// skips for providers that cannot serve it.
    fn ordered_providers(
        &self,
        operation: Operation,
        diagnostics: &mut FetchDiagnostics,
    ) -> Vec<&Arc<dyn MarketDataProvider>> {
        let mut eligible = Vec::new();

        for provider in &self.providers {
            if !provider.capabilities().supports(operation) {
                diagnostics.record_skip(
                    Cow::Borrowed(provider.id()),
                    SkipReason::OperationNotSupported { operation },
                );
                continue;
            }
            eligible.push(provider);
        }

        // Stable sort keeps registration order among equals
        eligible.sort_by_key(|p| {
            let configured = self
                .provider_order
                .iter()
                .position(|id| id == p.id())
                .unwrap_or(usize::MAX);
            (configured, p.priority())
        });
        eligible
    }

    /// Try providers in order until one succeeds.
    ///
    /// Returns the value with the id of the provider that produced it.
    async fn run_chain<T, F, Fut>(
        &self,
        symbol: &Symbol,
        operation: Operation,
        diagnostics: &mut FetchDiagnostics,
        call: F,
    ) -> Result<(T, &'static str), MarketDataError>
    where
        F: Fn(Arc<dyn MarketDataProvider>, String) -> Fut,
        Fut: Future<Output = Result<T, MarketDataError>>,
    {
        let providers = self.ordered_providers(operation, diagnostics);

        if providers.is_empty() {
            warn!("No providers available for {}", operation);
            return Err(MarketDataError::NoProvidersAvailable);
        }

        let mut last_error: Option<MarketDataError> = None;
        let mut remaining = providers.into_iter();

        while let Some(provider) = remaining.next() {
            let provider_id = provider.id();
            let provider_symbol = symbol.symbol_for(provider_id).to_string();

            debug!(
                "Fetching {} for {} from '{}' as '{}'",
                operation, symbol.ticker, provider_id, provider_symbol
            );

            match call(Arc::clone(provider), provider_symbol.clone()).await {
                Ok(value) => {
                    diagnostics.record_success(Cow::Borrowed(provider_id), provider_symbol);
                    if last_error.is_some() {
                        info!(
                            "{} for {} served by fallback provider: {}",
                            operation,
                            symbol.ticker,
                            diagnostics.summary()
                        );
                    }
                    return Ok((value, provider_id));
                }
                Err(e) => {
                    diagnostics.record_error(
                        Cow::Borrowed(provider_id),
                        provider_symbol,
                        e.clone(),
                    );

                    if e.retry_class() == RetryClass::Never {
                        // Terminal error - don't try other providers
                        debug!(
                            "Terminal error from '{}': {:?}, not retrying",
                            provider_id, e
                        );
                        return Err(e);
                    }

                    if self.fallback == FallbackPolicy::FailFast {
                        for skipped in remaining {
                            diagnostics
                                .record_skip(Cow::Borrowed(skipped.id()), SkipReason::FailFast);
                        }
                        return Err(e);
                    }

                    debug!(
                        "Provider '{}' failed with {:?}, trying next provider",
                        provider_id, e
                    );
                    last_error = Some(e);
                }
            }
        }

        warn!(
            "All providers failed for {} of {}: {}",
            operation,
            symbol.ticker,
            diagnostics.summary()
        );
        Err(last_error.unwrap_or(MarketDataError::NoProvidersAvailable))
    }
}

fn latest_bar(
    history: Result<PriceHistory, MarketDataError>,
    symbol: &Symbol,
    interval: Interval,
) -> Option<QuoteRecord> {
    match history {
        Ok(history) => history.latest().cloned(),
        Err(e) => {
            warn!("No {} bars for {}: {}", interval, symbol.ticker, e);
            None
        }
    }
}

#[async_trait]
impl SymbolValidator for MarketDataAggregator {
    /// A guessed ticker is real if any provider returns a quote for it.
    async fn confirm(&self, ticker: &str) -> bool {
        let candidate = ResolvedSymbol::ticker(ticker, ResolutionSource::Validated);
        match self.get_quote(&candidate).await {
            Ok(_) => true,
            Err(e) => {
                debug!("Validation lookup for '{}' failed: {}", ticker, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use chrono::NaiveDate;

    use super::*;
    use crate::models::ProviderOverrides;
    use crate::provider::ProviderCapabilities;
    use crate::registry::AttemptOutcome;

    enum Behavior {
        Close(f64),
        Fail(fn(&str) -> MarketDataError),
    }

    struct MockProvider {
        id: &'static str,
        priority: u8,
        capabilities: ProviderCapabilities,
        behavior: Behavior,
        calls: AtomicUsize,
        symbols: Mutex<Vec<String>>,
    }

    impl MockProvider {
        fn new(id: &'static str, priority: u8, behavior: Behavior) -> Arc<Self> {
            Self::with_capabilities(id, priority, ProviderCapabilities::ALL, behavior)
        }

        fn quotes_only(id: &'static str, priority: u8, behavior: Behavior) -> Arc<Self> {
            let capabilities = ProviderCapabilities {
                supports_quote: true,
                supports_snapshot: false,
                supports_history: false,
            };
            Self::with_capabilities(id, priority, capabilities, behavior)
        }

        fn with_capabilities(
            id: &'static str,
            priority: u8,
            capabilities: ProviderCapabilities,
            behavior: Behavior,
        ) -> Arc<Self> {
            Arc::new(Self {
                id,
                priority,
                capabilities,
                behavior,
                calls: AtomicUsize::new(0),
                symbols: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn bar(&self, symbol: &str, day: u32, close: f64) -> QuoteRecord {
            QuoteRecord {
                symbol: Arc::from(symbol),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: Some(100),
                as_of_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
                source: self.id.to_string(),
            }
        }

        fn enter(&self, symbol: &str) -> Result<f64, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.symbols.lock().unwrap().push(symbol.to_string());
            match &self.behavior {
                Behavior::Close(close) => Ok(*close),
                Behavior::Fail(make) => Err(make(self.id)),
            }
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockProvider {
        fn id(&self) -> &'static str {
            self.id
        }

        fn priority(&self) -> u8 {
            self.priority
        }

        fn capabilities(&self) -> ProviderCapabilities {
            self.capabilities
        }

        async fn get_quote(&self, symbol: &str) -> Result<QuoteRecord, MarketDataError> {
            let close = self.enter(symbol)?;
            Ok(self.bar(symbol, 15, close))
        }

        async fn get_snapshot(&self, symbol: &str) -> Result<MarketSnapshot, MarketDataError> {
            let close = self.enter(symbol)?;
            Ok(MarketSnapshot::new(Arc::from(symbol), close, self.id))
        }

        async fn get_history(
            &self,
            symbol: &str,
            _interval: Interval,
        ) -> Result<Vec<QuoteRecord>, MarketDataError> {
            let close = self.enter(symbol)?;
            // Reverse order on purpose; the aggregator sorts
            Ok((1..=6)
                .rev()
                .map(|day| self.bar(symbol, day, close + day as f64))
                .collect())
        }
    }

    fn transport(provider: &str) -> MarketDataError {
        MarketDataError::Transport {
            provider: provider.to_string(),
            message: "connection refused".to_string(),
        }
    }

    fn rate_limited(provider: &str) -> MarketDataError {
        MarketDataError::RateLimited {
            provider: provider.to_string(),
        }
    }

    fn invalid(_provider: &str) -> MarketDataError {
        MarketDataError::InvalidInput {
            message: "bad request".to_string(),
        }
    }

    fn resolved(ticker: &str) -> ResolvedSymbol {
        ResolvedSymbol::ticker(ticker, ResolutionSource::AliasTable)
    }

    fn aggregator(providers: &[Arc<MockProvider>]) -> MarketDataAggregator {
        MarketDataAggregator::new(
            providers
                .iter()
                .map(|p| p.clone() as Arc<dyn MarketDataProvider>)
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_unresolved_symbol_makes_no_provider_calls() {
        let provider = MockProvider::new("YAHOO", 1, Behavior::Close(100.0));
        let agg = aggregator(&[provider.clone()]);
        let unresolved = ResolvedSymbol::unresolved("Acme Widgets");

        let (quote, diagnostics) = agg.get_quote_with_diagnostics(&unresolved).await;
        assert!(matches!(
            quote,
            Err(MarketDataError::ResolutionFailure { ref query }) if query == "Acme Widgets"
        ));
        assert!(diagnostics.attempts.is_empty());

        assert!(matches!(
            agg.get_snapshot(&unresolved).await,
            Err(MarketDataError::ResolutionFailure { .. })
        ));
        assert!(matches!(
            agg.get_price_history(&unresolved, Interval::Weekly).await,
            Err(MarketDataError::ResolutionFailure { .. })
        ));
        assert!(agg.get_stock_report(&unresolved, "acme").await.is_err());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_failing_primary_falls_back_to_secondary() {
        let primary = MockProvider::new("YAHOO", 1, Behavior::Fail(transport));
        let secondary = MockProvider::new("FINNHUB", 2, Behavior::Close(261.74));
        let agg = aggregator(&[secondary.clone(), primary.clone()]);

        let (quote, diagnostics) = agg.get_quote_with_diagnostics(&resolved("AAPL")).await;
        let quote = quote.unwrap();

        assert_eq!(quote.close, 261.74);
        assert_eq!(quote.source, "FINNHUB");
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);

        assert_eq!(diagnostics.attempts.len(), 2);
        assert_eq!(diagnostics.attempts[0].provider_id, "YAHOO");
        assert_eq!(
            diagnostics.attempts[0].outcome,
            AttemptOutcome::Failed {
                error: transport("YAHOO")
            }
        );
        assert_eq!(diagnostics.succeeded_provider(), Some("FINNHUB"));
    }

    #[tokio::test]
    async fn test_all_providers_fail_returns_last_error() {
        let a = MockProvider::new("YAHOO", 1, Behavior::Fail(transport));
        let b = MockProvider::new("FINNHUB", 2, Behavior::Fail(rate_limited));
        let agg = aggregator(&[a.clone(), b.clone()]);

        let err = agg.get_quote(&resolved("AAPL")).await.unwrap_err();
        assert_eq!(err, rate_limited("FINNHUB"));
        assert_eq!(a.calls() + b.calls(), 2);
    }

    #[tokio::test]
    async fn test_fail_fast_stops_after_first_failure() {
        let a = MockProvider::new("YAHOO", 1, Behavior::Fail(transport));
        let b = MockProvider::new("FINNHUB", 2, Behavior::Close(10.0));
        let agg =
            aggregator(&[a.clone(), b.clone()]).with_fallback_policy(FallbackPolicy::FailFast);

        let (result, diagnostics) = agg.get_quote_with_diagnostics(&resolved("AAPL")).await;
        assert_eq!(result.unwrap_err(), transport("YAHOO"));
        assert_eq!(b.calls(), 0);
        assert_eq!(diagnostics.attempts.len(), 2);
        assert!(matches!(
            diagnostics.attempts[1].outcome,
            AttemptOutcome::Skipped {
                skip: SkipReason::FailFast
            }
        ));
    }

    #[tokio::test]
    async fn test_never_retry_error_stops_chain() {
        let a = MockProvider::new("YAHOO", 1, Behavior::Fail(invalid));
        let b = MockProvider::new("FINNHUB", 2, Behavior::Close(10.0));
        let agg = aggregator(&[a.clone(), b.clone()]);

        assert!(matches!(
            agg.get_quote(&resolved("AAPL")).await,
            Err(MarketDataError::InvalidInput { .. })
        ));
        assert_eq!(b.calls(), 0);
    }

    #[tokio::test]
    async fn test_configured_order_beats_default_priority() {
        let yahoo = MockProvider::new("YAHOO", 1, Behavior::Close(1.0));
        let alpha = MockProvider::new("ALPHA_VANTAGE", 3, Behavior::Close(3.0));
        let finnhub = MockProvider::new("FINNHUB", 2, Behavior::Close(2.0));
        let agg = aggregator(&[yahoo.clone(), alpha.clone(), finnhub.clone()])
            .with_provider_order(vec!["alpha_vantage".to_string()]);

        assert_eq!(
            agg.provider_chain(Operation::Quote),
            vec!["ALPHA_VANTAGE", "YAHOO", "FINNHUB"]
        );
        let quote = agg.get_quote(&resolved("IBM")).await.unwrap();
        assert_eq!(quote.source, "ALPHA_VANTAGE");
        assert_eq!(yahoo.calls(), 0);
    }

    #[tokio::test]
    async fn test_capability_filter_and_empty_chain() {
        let quotes_only = MockProvider::quotes_only("FINNHUB", 1, Behavior::Close(5.0));
        let agg = aggregator(&[quotes_only.clone()]);

        let (result, diagnostics) = agg.get_snapshot_with_diagnostics(&resolved("AAPL")).await;
        assert_eq!(result.unwrap_err(), MarketDataError::NoProvidersAvailable);
        assert!(matches!(
            diagnostics.attempts[0].outcome,
            AttemptOutcome::Skipped {
                skip: SkipReason::OperationNotSupported {
                    operation: Operation::Snapshot
                }
            }
        ));
        assert_eq!(quotes_only.calls(), 0);

        let empty = MarketDataAggregator::new(Vec::new());
        assert_eq!(
            empty.get_quote(&resolved("AAPL")).await.unwrap_err(),
            MarketDataError::NoProvidersAvailable
        );
    }

    #[tokio::test]
    async fn test_provider_override_and_canonical_relabel() {
        let alpha = MockProvider::new("ALPHA_VANTAGE", 1, Behavior::Close(42.0));
        let agg = aggregator(&[alpha.clone()]);

        let mut overrides = ProviderOverrides::new();
        overrides.insert("ALPHA_VANTAGE".to_string(), "HKG:1211".to_string());
        let byd = ResolvedSymbol::Resolved(
            Symbol::new("1211.HK", ResolutionSource::AliasTable).with_overrides(overrides),
        );

        let quote = agg.get_quote(&byd).await.unwrap();
        assert_eq!(alpha.symbols.lock().unwrap().as_slice(), ["HKG:1211"]);
        assert_eq!(quote.symbol.as_ref(), "1211.HK");
    }

    #[tokio::test]
    async fn test_price_history_sorted_with_change() {
        let provider = MockProvider::new("YAHOO", 1, Behavior::Close(100.0));
        let agg = aggregator(&[provider]);

        let history = agg
            .get_price_history(&resolved("NVDA"), Interval::Weekly)
            .await
            .unwrap();

        // Closes 101..=106 ascending after sort
        let closes: Vec<f64> = history.bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![101.0, 102.0, 103.0, 104.0, 105.0, 106.0]);
        let change = history.week_over_week_change.unwrap();
        assert!((change - (106.0 - 101.0) / 101.0 * 100.0).abs() < 1e-9);
        assert_eq!(history.source, "YAHOO");
        assert_eq!(history.interval, Interval::Weekly);
    }

    #[tokio::test]
    async fn test_stock_report_combines_daily_and_weekly() {
        let provider = MockProvider::new("YAHOO", 1, Behavior::Close(100.0));
        let agg = aggregator(&[provider.clone()]);

        let report = agg
            .get_stock_report(&resolved("NVDA"), " Nvidia ")
            .await
            .unwrap();
        assert_eq!(report.company, "Nvidia");
        assert_eq!(report.daily.map(|b| b.close), Some(106.0));
        assert_eq!(report.weekly.map(|b| b.close), Some(106.0));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_get_snapshots_keeps_input_order() {
        let provider = MockProvider::new("FINNHUB", 1, Behavior::Close(50.0));
        let agg = aggregator(&[provider.clone()]);

        let results = agg
            .get_snapshots(&[
                resolved("AAPL"),
                ResolvedSymbol::unresolved("???"),
                resolved("MSFT"),
            ])
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().symbol.as_ref(), "AAPL");
        assert!(matches!(
            results[1],
            Err(MarketDataError::ResolutionFailure { .. })
        ));
        assert_eq!(results[2].as_ref().unwrap().symbol.as_ref(), "MSFT");
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_validator_confirms_via_quote() {
        let good = MockProvider::new("YAHOO", 1, Behavior::Close(10.0));
        assert!(aggregator(&[good]).confirm("PLTR").await);

        let bad = MockProvider::new("YAHOO", 1, Behavior::Fail(transport));
        assert!(!aggregator(&[bad]).confirm("PLTR").await);
    }

    #[test]
    fn test_fallback_policy_parse() {
        assert_eq!(
            "fail-fast".parse::<FallbackPolicy>().unwrap(),
            FallbackPolicy::FailFast
        );
        assert_eq!(
            "NEXT_PROVIDER".parse::<FallbackPolicy>().unwrap(),
            FallbackPolicy::NextProvider
        );
        assert!("sometimes".parse::<FallbackPolicy>().is_err());
    }
}
