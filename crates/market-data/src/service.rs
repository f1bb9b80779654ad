//! Caller-facing tool operations.
//!
//! [`MarketDataService`] is what an agent runtime (or the HTTP server) talks
//! to: plain text in, normalized records out. Market operations resolve the
//! text first and stop at `ResolutionFailure` before any provider is called.

use std::sync::Arc;

use futures::future::join_all;
use log::{info, warn};

use crate::config::MarketDataConfig;
use crate::errors::MarketDataError;
use crate::models::{
    Interval, MarketSnapshot, NewsResponse, PriceHistory, QuoteRecord, ResolvedSymbol,
    SnapshotOutcome, StockReport,
};
use crate::news::{NewsFetcher, SearchProvider, TavilySearchProvider};
use crate::provider::alpha_vantage::AlphaVantageProvider;
use crate::provider::finnhub::FinnhubProvider;
use crate::provider::yahoo::YahooProvider;
use crate::provider::MarketDataProvider;
use crate::registry::{FetchDiagnostics, MarketDataAggregator};
use crate::resolver::{AliasTable, ResolverChain, ResolverPolicy, SymbolResolver};

/// Resolver, aggregator and news fetcher behind one handle.
pub struct MarketDataService {
    resolver: ResolverChain,
    aggregator: Arc<MarketDataAggregator>,
    news: NewsFetcher,
    default_result_limit: usize,
}

impl MarketDataService {
    pub fn builder(config: MarketDataConfig) -> MarketDataServiceBuilder {
        MarketDataServiceBuilder::new(config)
    }

    pub fn aggregator(&self) -> &MarketDataAggregator {
        &self.aggregator
    }

    pub fn default_result_limit(&self) -> usize {
        self.default_result_limit
    }

    /// Free text to canonical ticker (or `Unresolved`).
    pub async fn resolve(&self, query: &str) -> ResolvedSymbol {
        self.resolver.resolve(query).await
    }

    pub async fn get_quote(&self, query: &str) -> Result<QuoteRecord, MarketDataError> {
        let symbol = self.resolve(query).await;
        self.aggregator.get_quote(&symbol).await
    }

    /// Quote plus the provider attempts that produced it.
    pub async fn get_quote_with_diagnostics(
        &self,
        query: &str,
    ) -> (Result<QuoteRecord, MarketDataError>, FetchDiagnostics) {
        let symbol = self.resolve(query).await;
        self.aggregator.get_quote_with_diagnostics(&symbol).await
    }

    pub async fn get_snapshot(&self, query: &str) -> Result<MarketSnapshot, MarketDataError> {
        let symbol = self.resolve(query).await;
        self.aggregator.get_snapshot(&symbol).await
    }

    pub async fn get_price_history(
        &self,
        query: &str,
        interval: Interval,
    ) -> Result<PriceHistory, MarketDataError> {
        let symbol = self.resolve(query).await;
        self.aggregator.get_price_history(&symbol, interval).await
    }

    /// Latest daily and weekly bars for a company.
    pub async fn get_stock_report(&self, query: &str) -> Result<StockReport, MarketDataError> {
        let symbol = self.resolve(query).await;
        self.aggregator.get_stock_report(&symbol, query).await
    }

    /// Snapshots for several companies; each entry succeeds or fails on its own.
    pub async fn get_market_stats(&self, queries: &[String]) -> Vec<SnapshotOutcome> {
        let symbols = join_all(queries.iter().map(|q| self.resolve(q))).await;
        let results = self.aggregator.get_snapshots(&symbols).await;

        queries
            .iter()
            .zip(results)
            .map(|(query, result)| SnapshotOutcome::from_result(query.clone(), result))
            .collect()
    }

    /// Recent news about a company or ticker. `limit` defaults to the
    /// configured result limit.
    pub async fn search_news(&self, query: &str, limit: Option<usize>) -> NewsResponse {
        let symbol = self.resolve(query).await;
        self.news
            .search_news_for(&symbol, limit.unwrap_or(self.default_result_limit))
            .await
    }

    /// Web search for top companies; an empty query uses the default one.
    pub async fn top_companies(&self, query: Option<&str>, limit: Option<usize>) -> NewsResponse {
        self.news
            .search_web(
                query.unwrap_or_default(),
                limit.unwrap_or(self.default_result_limit),
            )
            .await
    }
}

/// Builds a [`MarketDataService`] from configuration.
///
/// Providers and the search backend can be injected (tests, alternative
/// backends); injected providers replace the configured ones.
pub struct MarketDataServiceBuilder {
    config: MarketDataConfig,
    providers: Vec<Arc<dyn MarketDataProvider>>,
    search: Option<Arc<dyn SearchProvider>>,
    alias_table: Option<Arc<AliasTable>>,
}

impl MarketDataServiceBuilder {
    pub fn new(config: MarketDataConfig) -> Self {
        Self {
            config,
            providers: Vec::new(),
            search: None,
            alias_table: None,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn MarketDataProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn with_search_provider(mut self, search: Arc<dyn SearchProvider>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_alias_table(mut self, table: Arc<AliasTable>) -> Self {
        self.alias_table = Some(table);
        self
    }

    pub fn build(self) -> MarketDataService {
        let config = self.config;

        let providers = if self.providers.is_empty() {
            configured_providers(&config)
        } else {
            self.providers
        };
        if providers.is_empty() {
            warn!("No market data providers configured; quote requests will fail");
        }

        let aggregator = Arc::new(
            MarketDataAggregator::new(providers)
                .with_provider_order(config.provider_order.clone())
                .with_fallback_policy(config.fallback_policy),
        );

        let mut resolver = ResolverChain::with_table(
            self.alias_table.unwrap_or_else(AliasTable::default_table),
        )
        .with_policy(config.resolver_policy);
        if config.resolver_policy == ResolverPolicy::Validate {
            resolver = resolver.with_validator(aggregator.clone());
        }

        let search = self.search.or_else(|| {
            config
                .tavily_api_key
                .clone()
                .filter(|key| !key.is_empty())
                .map(|key| Arc::new(TavilySearchProvider::new(key)) as Arc<dyn SearchProvider>)
        });
        let news = match search {
            Some(search) => NewsFetcher::new(search),
            None => {
                warn!("No search provider configured; news requests will report an error");
                NewsFetcher::unconfigured()
            }
        }
        .with_recency_days(config.news_recency_days);

        info!(
            "Market data service ready: providers [{}], fallback {}, resolver {}",
            aggregator
                .providers()
                .iter()
                .map(|p| p.id())
                .collect::<Vec<_>>()
                .join(", "),
            config.fallback_policy,
            config.resolver_policy
        );

        MarketDataService {
            resolver,
            aggregator,
            news,
            default_result_limit: config.default_result_limit,
        }
    }
}

fn configured_providers(config: &MarketDataConfig) -> Vec<Arc<dyn MarketDataProvider>> {
    let mut providers: Vec<Arc<dyn MarketDataProvider>> = Vec::new();

    if config.enable_yahoo {
        match YahooProvider::new() {
            Ok(yahoo) => providers.push(Arc::new(yahoo)),
            Err(e) => warn!("Yahoo provider disabled: {}", e),
        }
    }
    if let Some(key) = config.finnhub_api_key.clone().filter(|k| !k.is_empty()) {
        providers.push(Arc::new(FinnhubProvider::new(key)));
    }
    if let Some(key) = config.alpha_vantage_api_key.clone().filter(|k| !k.is_empty()) {
        providers.push(Arc::new(AlphaVantageProvider::new(key)));
    }

    providers
}
