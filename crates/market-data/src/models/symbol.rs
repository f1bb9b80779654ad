//! Resolution output: canonical symbols and the "unresolved" marker.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::types::{ProviderOverrides, Ticker};
use crate::errors::MarketDataError;

/// Indicates how a symbol was resolved.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolutionSource {
    /// Exact hit in the alias table.
    AliasTable,
    /// Uppercased query accepted on shape alone.
    Guess,
    /// Uppercased query confirmed by a live quote lookup.
    Validated,
}

/// A canonical ticker plus any provider-specific spellings of it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Symbol {
    pub ticker: Ticker,
    pub source: ResolutionSource,
    #[serde(skip_serializing_if = "ProviderOverrides::is_empty")]
    pub overrides: ProviderOverrides,
}

impl Symbol {
    pub fn new(ticker: impl Into<Ticker>, source: ResolutionSource) -> Self {
        Self {
            ticker: ticker.into(),
            source,
            overrides: ProviderOverrides::new(),
        }
    }

    pub fn with_overrides(mut self, overrides: ProviderOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// The symbol to send to `provider`: its override if one exists,
    /// otherwise the canonical ticker.
    pub fn symbol_for(&self, provider: &str) -> &str {
        self.overrides
            .get(provider)
            .map(String::as_str)
            .unwrap_or(self.ticker.as_ref())
    }
}

/// Result of resolving free text.
///
/// `Unresolved` is a legitimate outcome, not an error: callers branch on it
/// (or call [`require`](Self::require)) before touching any provider.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ResolvedSymbol {
    Resolved(Symbol),
    Unresolved { query: String },
}

impl ResolvedSymbol {
    pub fn unresolved(query: impl Into<String>) -> Self {
        Self::Unresolved {
            query: query.into(),
        }
    }

    /// Shorthand for a canonical ticker that needs no resolution.
    pub fn ticker(ticker: &str, source: ResolutionSource) -> Self {
        Self::Resolved(Symbol::new(Arc::<str>::from(ticker), source))
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn symbol(&self) -> Option<&Symbol> {
        match self {
            Self::Resolved(symbol) => Some(symbol),
            Self::Unresolved { .. } => None,
        }
    }

    /// The resolved symbol, or `ResolutionFailure` carrying the original query.
    pub fn require(&self) -> Result<&Symbol, MarketDataError> {
        match self {
            Self::Resolved(symbol) => Ok(symbol),
            Self::Unresolved { query } => Err(MarketDataError::ResolutionFailure {
                query: query.clone(),
            }),
        }
    }
}

impl fmt::Display for ResolvedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(symbol) => f.write_str(&symbol.ticker),
            Self::Unresolved { query } => write!(f, "Unresolved: {}", query),
        }
    }
}
