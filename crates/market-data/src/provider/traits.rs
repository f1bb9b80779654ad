//! Market data provider trait definitions.
//!
//! This module defines the core `MarketDataProvider` trait that all
//! market data providers must implement.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{Interval, MarketSnapshot, QuoteRecord};

use super::capabilities::ProviderCapabilities;

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source.
/// The aggregator uses the provider's capabilities and priority
/// to decide when to call it.
///
/// Every method receives the provider-specific symbol (already looked up
/// through [`Symbol::symbol_for`](crate::models::Symbol::symbol_for)); the
/// aggregator relabels returned records with the canonical ticker.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use finagent_market_data::provider::{MarketDataProvider, ProviderCapabilities};
///
/// struct MyProvider {
///     api_key: String,
/// }
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn capabilities(&self) -> ProviderCapabilities {
///         ProviderCapabilities {
///             supports_quote: true,
///             supports_snapshot: false,
///             supports_history: false,
///         }
///     }
///
///     // ... implement get_quote
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "YAHOO", "ALPHA_VANTAGE", etc.
    /// Used for logging, ordering configuration and symbol overrides.
    fn id(&self) -> &'static str;

    /// Provider priority for ordering.
    ///
    /// Lower values = higher priority. Default is 10.
    /// Only consulted for providers missing from the configured order.
    fn priority(&self) -> u8 {
        10
    }

    /// Describes which operations this provider can serve.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Fetch the latest daily bar for a symbol.
    async fn get_quote(&self, symbol: &str) -> Result<QuoteRecord, MarketDataError>;

    /// Fetch a point-in-time snapshot.
    ///
    /// Default implementation returns `NotSupported`.
    async fn get_snapshot(&self, symbol: &str) -> Result<MarketSnapshot, MarketDataError> {
        let _ = symbol;
        Err(MarketDataError::NotSupported {
            operation: "snapshot".to_string(),
            provider: self.id().to_string(),
        })
    }

    /// Fetch a bar series covering [`Interval::lookback_days`].
    ///
    /// Bars may come back in any order. Default implementation returns
    /// `NotSupported`.
    async fn get_history(
        &self,
        symbol: &str,
        interval: Interval,
    ) -> Result<Vec<QuoteRecord>, MarketDataError> {
        let _ = (symbol, interval);
        Err(MarketDataError::NotSupported {
            operation: "history".to_string(),
            provider: self.id().to_string(),
        })
    }
}
