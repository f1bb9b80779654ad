//! Resolution traits for the market data crate.
//!
//! Defines the abstractions for turning free text into a canonical symbol.

use async_trait::async_trait;

use crate::models::{ResolvedSymbol, Symbol};

/// Individual resolver in the resolution chain.
///
/// Resolvers are tried in order until one returns a symbol.
/// Returning `None` means this resolver cannot handle the query,
/// and the chain should try the next resolver.
pub trait Resolver: Send + Sync {
    /// Attempt to resolve a query.
    ///
    /// # Arguments
    /// * `normalized` - The query trimmed and lowercased
    /// * `trimmed` - The query trimmed, original case
    fn resolve(&self, normalized: &str, trimmed: &str) -> Option<Symbol>;
}

/// Live confirmation that a guessed ticker exists.
///
/// Implemented by the aggregator (a latest-quote lookup). Any failure,
/// including a transport error, means "not confirmed".
#[async_trait]
pub trait SymbolValidator: Send + Sync {
    async fn confirm(&self, ticker: &str) -> bool;
}

/// Main symbol resolver interface.
#[async_trait]
pub trait SymbolResolver: Send + Sync {
    /// Resolve free text. Never fails: an unknown query is
    /// `ResolvedSymbol::Unresolved` carrying the original text.
    async fn resolve(&self, query: &str) -> ResolvedSymbol;

    /// Table-only lookup, no guessing and no network.
    fn lookup(&self, query: &str) -> Option<Symbol>;
}
