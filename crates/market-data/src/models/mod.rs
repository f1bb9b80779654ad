//! Market data models
//!
//! This module contains the canonical records handed back to callers:
//! - `types` - Type aliases (ProviderId, Ticker, ProviderOverrides)
//! - `symbol` - Resolution output (Symbol, ResolvedSymbol, ResolutionSource)
//! - `quote` - Bars and series (QuoteRecord, Interval, PriceHistory, StockReport)
//! - `snapshot` - Point-in-time views (MarketSnapshot, SnapshotOutcome)
//! - `search` - Web search results (SearchResult, NewsResponse)
//! - `numeric` - Coercion of provider-encoded numbers

mod numeric;
mod quote;
mod search;
mod snapshot;
mod symbol;
mod types;

pub use numeric::{coerce_f64, lenient_f64, lenient_u64, parse_f64, parse_u64};
pub(crate) use numeric::f64_to_u64;
pub use quote::{Interval, PriceHistory, QuoteRecord, StockReport};
pub use search::{NewsResponse, SearchResult};
pub use snapshot::{MarketSnapshot, SnapshotOutcome};
pub use symbol::{ResolutionSource, ResolvedSymbol, Symbol};
pub use types::{ProviderId, ProviderOverrides, Ticker};
