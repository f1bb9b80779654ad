//! Library configuration.

use std::fmt;

use crate::news::{DEFAULT_RECENCY_DAYS, DEFAULT_RESULT_LIMIT};
use crate::registry::FallbackPolicy;
use crate::resolver::ResolverPolicy;

/// Settings for [`MarketDataServiceBuilder`](crate::service::MarketDataServiceBuilder).
///
/// Providers that need a key are only registered when the key is present.
#[derive(Clone)]
pub struct MarketDataConfig {
    pub finnhub_api_key: Option<String>,
    pub alpha_vantage_api_key: Option<String>,
    pub tavily_api_key: Option<String>,
    /// Provider ids tried first, in this order (e.g. `["FINNHUB", "YAHOO"]`)
    pub provider_order: Vec<String>,
    pub fallback_policy: FallbackPolicy,
    pub resolver_policy: ResolverPolicy,
    pub news_recency_days: u32,
    pub default_result_limit: usize,
    pub enable_yahoo: bool,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            finnhub_api_key: None,
            alpha_vantage_api_key: None,
            tavily_api_key: None,
            provider_order: Vec::new(),
            fallback_policy: FallbackPolicy::default(),
            resolver_policy: ResolverPolicy::default(),
            news_recency_days: DEFAULT_RECENCY_DAYS,
            default_result_limit: DEFAULT_RESULT_LIMIT,
            enable_yahoo: true,
        }
    }
}

fn redact(key: &Option<String>) -> &'static str {
    match key {
        Some(k) if !k.is_empty() => "<set>",
        _ => "<unset>",
    }
}

// Keys never reach logs
impl fmt::Debug for MarketDataConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketDataConfig")
            .field("finnhub_api_key", &redact(&self.finnhub_api_key))
            .field("alpha_vantage_api_key", &redact(&self.alpha_vantage_api_key))
            .field("tavily_api_key", &redact(&self.tavily_api_key))
            .field("provider_order", &self.provider_order)
            .field("fallback_policy", &self.fallback_policy)
            .field("resolver_policy", &self.resolver_policy)
            .field("news_recency_days", &self.news_recency_days)
            .field("default_result_limit", &self.default_result_limit)
            .field("enable_yahoo", &self.enable_yahoo)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MarketDataConfig::default();
        assert_eq!(config.news_recency_days, 14);
        assert_eq!(config.default_result_limit, 5);
        assert!(config.enable_yahoo);
        assert_eq!(config.fallback_policy, FallbackPolicy::NextProvider);
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = MarketDataConfig {
            finnhub_api_key: Some("secret-finnhub".to_string()),
            ..MarketDataConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-finnhub"));
        assert!(debug.contains("finnhub_api_key: \"<set>\""));
        assert!(debug.contains("tavily_api_key: \"<unset>\""));
    }
}
