//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Provider capabilities (which operations a provider serves)
//! - Concrete provider implementations (Yahoo, Finnhub, Alpha Vantage)
//!
//! # Provider Symbols
//!
//! Providers receive the provider-specific symbol, already picked by the
//! aggregator from the resolved symbol's overrides. They never see free
//! text and never see an unresolved query.

mod capabilities;
pub(crate) mod http;
mod traits;

pub mod alpha_vantage;
pub mod finnhub;
pub mod yahoo;

pub use capabilities::{Operation, ProviderCapabilities};
pub use http::REQUEST_TIMEOUT;
pub use traits::MarketDataProvider;
