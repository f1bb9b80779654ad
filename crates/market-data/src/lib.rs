//! FinAgent Market Data Crate
//!
//! The tool layer behind a financial research agent: it turns loosely
//! phrased company references into tickers, fetches prices from a chain of
//! market data providers, and runs recency-bounded news searches.
//!
//! # Overview
//!
//! - Symbol resolution: alias table first, then an uppercase guess (optionally
//!   confirmed by a live quote)
//! - Multiple providers: Yahoo Finance, Finnhub, Alpha Vantage, tried in order
//!   until one succeeds
//! - Normalized records: [`QuoteRecord`], [`MarketSnapshot`], [`PriceHistory`]
//! - News and web search through Tavily, with failures reported in-band
//!
//! # Architecture
//!
//! ```text
//!  "  Nvidia "                      "latest EV news"
//!       |                                  |
//!       v                                  v
//! +------------------+            +------------------+
//! |  ResolverChain   |            |   NewsFetcher    |
//! +------------------+            +------------------+
//!       | ResolvedSymbol                   |
//!       v                                  v
//! +----------------------+        +------------------+
//! | MarketDataAggregator |        |  SearchProvider  |  (Tavily)
//! +----------------------+        +------------------+
//!       |
//!       v
//! +------------------+
//! |    Providers     |  (Yahoo -> Finnhub -> Alpha Vantage)
//! +------------------+
//! ```
//!
//! [`MarketDataService`] wires all of it together from a [`MarketDataConfig`].

pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod news;
pub mod provider;
pub mod registry;
pub mod resolver;
pub mod service;

pub use config::MarketDataConfig;
pub use errors::{MarketDataError, RetryClass};
pub use metrics::week_over_week_change;

pub use models::{
    Interval, MarketSnapshot, NewsResponse, PriceHistory, ProviderId, QuoteRecord,
    ResolutionSource, ResolvedSymbol, SearchResult, SnapshotOutcome, StockReport, Symbol, Ticker,
};

pub use resolver::{AliasTable, ResolverChain, ResolverPolicy, SymbolResolver, SymbolValidator};

pub use provider::alpha_vantage::AlphaVantageProvider;
pub use provider::finnhub::FinnhubProvider;
pub use provider::yahoo::YahooProvider;
pub use provider::{MarketDataProvider, Operation, ProviderCapabilities};

pub use news::{NewsFetcher, SearchProvider, SearchRequest, SearchTopic, TavilySearchProvider};

pub use registry::{FallbackPolicy, FetchDiagnostics, MarketDataAggregator, ProviderAttempt};

pub use service::{MarketDataService, MarketDataServiceBuilder};
