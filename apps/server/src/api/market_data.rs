use std::sync::Arc;

use crate::{
    api::{require_text, ApiJson, ApiQuery},
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use finagent_market_data::{
    FetchDiagnostics, Interval, MarketSnapshot, Operation, PriceHistory,
    QuoteRecord, SnapshotOutcome, StockReport,
};
use serde::{Deserialize, Serialize};

/// Maximum number of companies in one stats request.
const MAX_STATS_QUERIES: usize = 20;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SymbolQuery {
    query: String,
    #[serde(default)]
    diagnostics: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    quote: QuoteRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostics: Option<FetchDiagnostics>,
}

async fn get_quote(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<SymbolQuery>,
) -> ApiResult<Json<QuoteResponse>> {
    let query = require_text("query", &params.query)?;
    let (result, diagnostics) = state.market_data.get_quote_with_diagnostics(query).await;
    tracing::debug!("Quote for '{}': {}", query, diagnostics.summary());
    Ok(Json(QuoteResponse {
        quote: result?,
        diagnostics: params.diagnostics.then_some(diagnostics),
    }))
}

async fn get_snapshot(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<SymbolQuery>,
) -> ApiResult<Json<MarketSnapshot>> {
    let query = require_text("query", &params.query)?;
    Ok(Json(state.market_data.get_snapshot(query).await?))
}

#[derive(Deserialize)]
struct HistoryQuery {
    query: String,
    interval: Option<String>,
}

async fn get_history(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<HistoryQuery>,
) -> ApiResult<Json<PriceHistory>> {
    let query = require_text("query", &params.query)?;
    let interval = match params.interval.as_deref() {
        Some(raw) => raw.parse::<Interval>()?,
        None => Interval::default(),
    };
    Ok(Json(
        state.market_data.get_price_history(query, interval).await?,
    ))
}

#[derive(Deserialize)]
struct ReportQuery {
    query: String,
}

async fn get_stock_report(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ReportQuery>,
) -> ApiResult<Json<StockReport>> {
    let company = require_text("query", &params.query)?;
    Ok(Json(state.market_data.get_stock_report(company).await?))
}

#[derive(Deserialize)]
struct StatsRequest {
    queries: Vec<String>,
}

async fn get_market_stats(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<StatsRequest>,
) -> ApiResult<Json<Vec<SnapshotOutcome>>> {
    if body.queries.is_empty() {
        return Err(ApiError::BadRequest("queries must not be empty".to_string()));
    }
    if body.queries.len() > MAX_STATS_QUERIES {
        return Err(ApiError::BadRequest(format!(
            "at most {} queries per request",
            MAX_STATS_QUERIES
        )));
    }
    Ok(Json(state.market_data.get_market_stats(&body.queries).await))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProviderChains {
    fallback_policy: String,
    quote: Vec<&'static str>,
    snapshot: Vec<&'static str>,
    history: Vec<&'static str>,
}

/// The order in which providers are tried for each operation.
async fn get_providers(State(state): State<Arc<AppState>>) -> ApiResult<Json<ProviderChains>> {
    let aggregator = state.market_data.aggregator();
    Ok(Json(ProviderChains {
        fallback_policy: aggregator.fallback_policy().to_string(),
        quote: aggregator.provider_chain(Operation::Quote),
        snapshot: aggregator.provider_chain(Operation::Snapshot),
        history: aggregator.provider_chain(Operation::History),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/market-data/quote", get(get_quote))
        .route("/market-data/snapshot", get(get_snapshot))
        .route("/market-data/history", get(get_history))
        .route("/market-data/report", get(get_stock_report))
        .route("/market-data/stats", post(get_market_stats))
        .route("/market-data/providers", get(get_providers))
}
