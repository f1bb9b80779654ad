//! Tavily web search client.
//!
//! API documentation: https://docs.tavily.com

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{SearchProvider, SearchRequest, SearchTopic};
use crate::errors::MarketDataError;
use crate::models::SearchResult;
use crate::provider::http::{build_client, parse_json, read_body, transport_error};

const SEARCH_URL: &str = "https://api.tavily.com/search";
const PROVIDER_ID: &str = "TAVILY";

#[derive(Debug, Serialize)]
struct SearchBody<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    topic: SearchTopic,
    #[serde(skip_serializing_if = "Option::is_none")]
    days: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

fn parse_results(body: &str) -> Result<Vec<SearchResult>, MarketDataError> {
    let response: SearchResponse = parse_json(PROVIDER_ID, "search", body)?;
    Ok(response
        .results
        .into_iter()
        .map(|r| SearchResult::new(r.title, r.content, r.url))
        .collect())
}

/// Tavily search provider.
pub struct TavilySearchProvider {
    client: Client,
    api_key: String,
}

impl TavilySearchProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: build_client(),
            api_key,
        }
    }
}

#[async_trait]
impl SearchProvider for TavilySearchProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, MarketDataError> {
        let body = SearchBody {
            api_key: &self.api_key,
            query: &request.query,
            max_results: request.max_results,
            topic: request.topic,
            days: match request.topic {
                SearchTopic::News => request.days,
                SearchTopic::General => None,
            },
        };

        debug!(
            "Tavily search: '{}' (max_results={}, topic={:?})",
            request.query, request.max_results, request.topic
        );

        let response = self
            .client
            .post(SEARCH_URL)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_ID, e))?;

        let text = read_body(PROVIDER_ID, response).await?;
        parse_results(&text)
    }
}
