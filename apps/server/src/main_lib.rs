use std::sync::Arc;

use crate::config::Config;
use finagent_market_data::MarketDataService;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub market_data: Arc<MarketDataService>,
}

impl AppState {
    pub fn new(market_data: MarketDataService) -> Arc<Self> {
        Arc::new(Self {
            market_data: Arc::new(market_data),
        })
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("FA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    tracing::debug!("Market data config: {:?}", config.market_data);
    let service = MarketDataService::builder(config.market_data.clone()).build();
    Ok(AppState::new(service))
}
