use std::sync::Arc;

use crate::{
    api::{check_limit, require_text, ApiQuery},
    error::ApiResult,
    main_lib::AppState,
};
use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use finagent_market_data::NewsResponse;

#[derive(serde::Deserialize)]
struct NewsQuery {
    query: String,
    limit: Option<usize>,
}

/// Search failures come back as a 200 with `error` set and no results.
async fn search_news(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<NewsQuery>,
) -> ApiResult<Json<NewsResponse>> {
    let query = require_text("query", &params.query)?;
    let limit = check_limit(params.limit)?;
    Ok(Json(state.market_data.search_news(query, limit).await))
}

#[derive(serde::Deserialize)]
struct TopCompaniesQuery {
    query: Option<String>,
    limit: Option<usize>,
}

async fn top_companies(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<TopCompaniesQuery>,
) -> ApiResult<Json<NewsResponse>> {
    let limit = check_limit(params.limit)?;
    Ok(Json(
        state
            .market_data
            .top_companies(params.query.as_deref(), limit)
            .await,
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/news", get(search_news))
        .route("/search/top-companies", get(top_companies))
}
