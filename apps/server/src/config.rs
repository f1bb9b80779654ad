use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use finagent_market_data::{FallbackPolicy, MarketDataConfig, ResolverPolicy};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub market_data: MarketDataConfig,
}

impl Config {
    /// Reads `.env` (if any) and the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr: SocketAddr = var("FA_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid FA_LISTEN_ADDR")?;
        let cors_allow = split_list(&var("FA_CORS_ALLOW_ORIGINS").unwrap_or_else(|| "*".into()));
        let timeout_ms: u64 = var("FA_REQUEST_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(30000);

        let defaults = MarketDataConfig::default();
        let fallback_policy = match var("FA_FALLBACK_POLICY") {
            Some(v) => v
                .parse::<FallbackPolicy>()
                .context("Invalid FA_FALLBACK_POLICY")?,
            None => defaults.fallback_policy,
        };
        let resolver_policy = match var("FA_RESOLVER_POLICY") {
            Some(v) => v
                .parse::<ResolverPolicy>()
                .context("Invalid FA_RESOLVER_POLICY")?,
            None => defaults.resolver_policy,
        };

        let market_data = MarketDataConfig {
            finnhub_api_key: var("FINNHUB_API_KEY"),
            alpha_vantage_api_key: var("ALPHA_VANTAGE_API_KEY").or_else(|| var("ALPHA_API_KEY")),
            tavily_api_key: var("TAVILY_API_KEY"),
            provider_order: var("FA_PROVIDER_ORDER")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            fallback_policy,
            resolver_policy,
            news_recency_days: var("FA_NEWS_RECENCY_DAYS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.news_recency_days),
            default_result_limit: var("FA_DEFAULT_RESULT_LIMIT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_result_limit),
            enable_yahoo: var("FA_ENABLE_YAHOO")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"))
                .unwrap_or(defaults.enable_yahoo),
        };

        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            market_data,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
