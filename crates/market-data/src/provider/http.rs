//! Request plumbing shared by the HTTP-based clients.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::errors::MarketDataError;

/// Per-request timeout for every provider client.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn build_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Map a `reqwest` send/read failure to `Transport`.
///
/// The URL is stripped first: some providers carry the API key in the query string.
pub(crate) fn transport_error(provider: &str, error: reqwest::Error) -> MarketDataError {
    let error = error.without_url();
    let message = if error.is_timeout() {
        "Request timed out".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        format!("Request failed: {}", error)
    };
    MarketDataError::Transport {
        provider: provider.to_string(),
        message,
    }
}

/// Classify a status line; `None` for success.
///
/// 429 is `RateLimited`, 401 is a key problem, any other non-2xx is a
/// `ProviderError` carrying the status and the start of the body.
pub(crate) fn status_error(
    provider: &str,
    status: StatusCode,
    body: &str,
) -> Option<MarketDataError> {
    if status.is_success() {
        return None;
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Some(MarketDataError::RateLimited {
            provider: provider.to_string(),
        });
    }

    let message = if status == StatusCode::UNAUTHORIZED {
        "Invalid or missing API key".to_string()
    } else {
        let detail = body.chars().take(200).collect::<String>();
        if detail.is_empty() {
            format!("HTTP {}", status)
        } else {
            format!("HTTP {} - {}", status, detail)
        }
    };

    Some(MarketDataError::ProviderError {
        provider: provider.to_string(),
        status: Some(status.as_u16()),
        message,
    })
}

/// Check the status line and read the body.
pub(crate) async fn read_body(
    provider: &str,
    response: Response,
) -> Result<String, MarketDataError> {
    let status = response.status();
    let body = response.text().await;

    if let Some(error) = status_error(provider, status, body.as_deref().unwrap_or_default()) {
        return Err(error);
    }

    body.map_err(|e| transport_error(provider, e))
}

/// Deserialize a body, mapping failures to a malformed-payload `ProviderError`.
pub(crate) fn parse_json<T: DeserializeOwned>(
    provider: &str,
    what: &str,
    body: &str,
) -> Result<T, MarketDataError> {
    serde_json::from_str(body).map_err(|e| {
        MarketDataError::provider_error(
            provider,
            format!("Failed to parse {} response: {}", what, e),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[allow(dead_code)]
        value: f64,
    }

    #[test]
    fn test_parse_json_malformed() {
        let err = parse_json::<Payload>("FINNHUB", "quote", "{not json").unwrap_err();
        match err {
            MarketDataError::ProviderError {
                provider, status, ..
            } => {
                assert_eq!(provider, "FINNHUB");
                assert_eq!(status, None);
            }
            other => panic!("Expected ProviderError, got {:?}", other),
        }
    }

    #[test]
    fn test_status_error_mapping() {
        assert_eq!(status_error("FINNHUB", StatusCode::OK, "{}"), None);

        assert_eq!(
            status_error("FINNHUB", StatusCode::TOO_MANY_REQUESTS, "slow down"),
            Some(MarketDataError::RateLimited {
                provider: "FINNHUB".to_string()
            })
        );

        assert_eq!(
            status_error("FINNHUB", StatusCode::UNAUTHORIZED, "bad token"),
            Some(MarketDataError::ProviderError {
                provider: "FINNHUB".to_string(),
                status: Some(401),
                message: "Invalid or missing API key".to_string(),
            })
        );
    }

    #[test]
    fn test_status_error_truncates_body() {
        let body = "x".repeat(500);
        match status_error("ALPHA_VANTAGE", StatusCode::INTERNAL_SERVER_ERROR, &body) {
            Some(MarketDataError::ProviderError {
                status, message, ..
            }) => {
                assert_eq!(status, Some(500));
                assert_eq!(
                    message,
                    format!("HTTP 500 Internal Server Error - {}", "x".repeat(200))
                );
            }
            other => panic!("Expected ProviderError, got {:?}", other),
        }

        match status_error("ALPHA_VANTAGE", StatusCode::BAD_GATEWAY, "") {
            Some(MarketDataError::ProviderError { message, .. }) => {
                assert_eq!(message, "HTTP 502 Bad Gateway");
            }
            other => panic!("Expected ProviderError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        let error = build_client()
            .get("http://127.0.0.1:1/query?function=GLOBAL_QUOTE&symbol=IBM&apikey=SECRETKEY123")
            .send()
            .await
            .unwrap_err();

        match transport_error("ALPHA_VANTAGE", error) {
            MarketDataError::Transport { provider, message } => {
                assert_eq!(provider, "ALPHA_VANTAGE");
                assert!(!message.contains("SECRETKEY123"), "{}", message);
                assert!(!message.contains("apikey"), "{}", message);
            }
            other => panic!("Expected Transport, got {:?}", other),
        }
    }
}
