//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all market data operations
//! - [`RetryClass`]: Classification for determining fallback behavior
//!
//! Errors are plain data: they are `Clone` and `Serialize` so that a caller
//! (an agent runtime, the HTTP surface) can hand them back as structured results.

mod retry;

pub use retry::RetryClass;

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during market data operations.
///
/// Each variant is classified into a [`RetryClass`] via the [`retry_class`](Self::retry_class)
/// method, which determines how the aggregator should handle the error.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MarketDataError {
    /// The input text did not map to any known or guessable symbol.
    /// Raised before any provider is contacted.
    #[error("Could not resolve symbol for '{query}'")]
    ResolutionFailure {
        /// The original query text
        query: String,
    },

    /// The provider does not know the requested symbol.
    #[error("Symbol not found: {symbol} ({provider})")]
    SymbolNotFound {
        /// The provider that did not recognise the symbol
        provider: String,
        /// The provider-specific symbol that was requested
        symbol: String,
    },

    /// The symbol exists but the provider returned no bars for the window.
    #[error("No data for range: {provider}")]
    NoDataForRange {
        /// The provider that returned an empty series
        provider: String,
    },

    /// The provider throttled the request (HTTP 429 or a throttling body).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// A non-success status or a malformed payload.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// HTTP status when the failure came from the status line
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        /// The error message from the provider or the parser
        message: String,
    },

    /// Network-level failure: timeout, refused connection, broken body.
    #[error("Transport error: {provider} - {message}")]
    Transport {
        /// The provider that could not be reached
        provider: String,
        /// Description of the network failure
        message: String,
    },

    /// The provider does not implement this operation.
    #[error("{operation} not supported by {provider}")]
    NotSupported {
        /// Name of the operation (quote, snapshot, history)
        operation: String,
        /// The provider lacking the operation
        provider: String,
    },

    /// Caller input that no provider could serve.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input
        message: String,
    },

    /// No configured provider supports the requested operation.
    #[error("No providers available")]
    NoProvidersAvailable,
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use finagent_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::RateLimited { provider: "FINNHUB".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::NextProvider);
    ///
    /// let error = MarketDataError::ResolutionFailure { query: "???".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::ResolutionFailure { .. }
            | Self::InvalidInput { .. }
            | Self::NoProvidersAvailable => RetryClass::Never,

            Self::SymbolNotFound { .. }
            | Self::NoDataForRange { .. }
            | Self::RateLimited { .. }
            | Self::ProviderError { .. }
            | Self::Transport { .. }
            | Self::NotSupported { .. } => RetryClass::NextProvider,
        }
    }

    /// The provider the error originated from, if any.
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::SymbolNotFound { provider, .. }
            | Self::NoDataForRange { provider }
            | Self::RateLimited { provider }
            | Self::ProviderError { provider, .. }
            | Self::Transport { provider, .. }
            | Self::NotSupported { provider, .. } => Some(provider),
            Self::ResolutionFailure { .. }
            | Self::InvalidInput { .. }
            | Self::NoProvidersAvailable => None,
        }
    }

    pub(crate) fn provider_error(provider: &str, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider: provider.to_string(),
            status: None,
            message: message.into(),
        }
    }
}
