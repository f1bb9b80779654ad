use async_trait::async_trait;
use serde::Serialize;

use crate::errors::MarketDataError;
use crate::models::SearchResult;

/// Search flavor; news searches honor the recency window.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchTopic {
    News,
    General,
}

/// One search call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: usize,
    /// Only results from the last `days` days (news topic only)
    pub days: Option<u32>,
    pub topic: SearchTopic,
}

/// A web search backend.
///
/// Implementations return results in their own relevance order; the
/// fetcher never reorders them.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn id(&self) -> &'static str;

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, MarketDataError>;
}
