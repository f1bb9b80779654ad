use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use finagent_market_data::MarketDataError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    MarketData(#[from] MarketDataError),
    #[error("{0}")]
    BadRequest(String),
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

fn market_data_status(error: &MarketDataError) -> StatusCode {
    match error {
        MarketDataError::ResolutionFailure { .. }
        | MarketDataError::SymbolNotFound { .. }
        | MarketDataError::NoDataForRange { .. } => StatusCode::NOT_FOUND,
        MarketDataError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        MarketDataError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        MarketDataError::ProviderError { .. } | MarketDataError::Transport { .. } => {
            StatusCode::BAD_GATEWAY
        }
        MarketDataError::NotSupported { .. } => StatusCode::NOT_IMPLEMENTED,
        MarketDataError::NoProvidersAvailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::MarketData(e) => (market_data_status(e), e.to_string()),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
        };
        if status.is_server_error() {
            tracing::warn!("Request failed with {}: {}", status, msg);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
