//! Web search result models.

use serde::Serialize;

use crate::errors::MarketDataError;

/// One search hit, in the order the search provider returned it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

impl SearchResult {
    pub fn new(
        title: impl Into<String>,
        snippet: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            url: url.into(),
        }
    }
}

/// Outcome of a news or web search.
///
/// A failed search is an empty `results` list plus the structured `error`,
/// never a panic and never a silent empty list.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewsResponse {
    /// The query string actually sent to the provider
    pub query: String,
    pub results: Vec<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<MarketDataError>,
}

impl NewsResponse {
    pub fn ok(query: impl Into<String>, results: Vec<SearchResult>) -> Self {
        Self {
            query: query.into(),
            results,
            error: None,
        }
    }

    pub fn failed(query: impl Into<String>, error: MarketDataError) -> Self {
        Self {
            query: query.into(),
            results: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
