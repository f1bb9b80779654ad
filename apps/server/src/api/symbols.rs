use std::sync::Arc;

use crate::{
    api::{require_text, ApiQuery},
    error::ApiResult,
    main_lib::AppState,
};
use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use finagent_market_data::ResolvedSymbol;

#[derive(serde::Deserialize)]
struct ResolveQuery {
    query: String,
}

/// Resolve free text to a ticker. `Unresolved` is a normal 200 response.
async fn resolve_symbol(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ResolveQuery>,
) -> ApiResult<Json<ResolvedSymbol>> {
    let query = require_text("query", &params.query)?;
    Ok(Json(state.market_data.resolve(query).await))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/symbols/resolve", get(resolve_symbol))
}
