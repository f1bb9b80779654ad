//! Market data aggregation.
//!
//! This module provides orchestration for market data providers, including:
//! - Capability filtering and priority ordering
//! - Fallback across providers driven by error retry classes
//! - Diagnostic tracking of every provider attempt

mod aggregator;
mod diagnostics;

pub use aggregator::{FallbackPolicy, MarketDataAggregator};
pub use diagnostics::{AttemptOutcome, FetchDiagnostics, ProviderAttempt, SkipReason};
