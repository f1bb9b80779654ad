mod market_data;
mod news;
mod symbols;

use std::sync::Arc;

use crate::{config::Config, error::ApiError, main_lib::AppState};
use axum::{
    extract::{FromRequest, FromRequestParts},
    http::HeaderValue,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Upper bound on `limit` for search endpoints.
pub const MAX_RESULT_LIMIT: usize = 20;

/// `Query` whose rejections render as `{code, message}`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub(crate) struct ApiQuery<T>(pub T);

/// `Json` body whose rejections render as `{code, message}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub(crate) struct ApiJson<T>(pub T);

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn readyz() -> &'static str {
    "ok"
}

pub(crate) fn check_limit(limit: Option<usize>) -> Result<Option<usize>, ApiError> {
    match limit {
        Some(n) if n > MAX_RESULT_LIMIT => Err(ApiError::BadRequest(format!(
            "limit must be at most {}",
            MAX_RESULT_LIMIT
        ))),
        other => Ok(other),
    }
}

pub(crate) fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str, ApiError> {
    match value.trim() {
        "" => Err(ApiError::BadRequest(format!("{} must not be empty", field))),
        _ => Ok(value),
    }
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let api = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .merge(symbols::router())
        .merge(market_data::router())
        .merge(news::router());

    Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
