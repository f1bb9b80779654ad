//! News and web search with a recency window and a result limit.

use std::sync::Arc;

use log::{debug, warn};

use super::traits::{SearchProvider, SearchRequest, SearchTopic};
use crate::errors::MarketDataError;
use crate::models::{NewsResponse, ResolvedSymbol};

pub const DEFAULT_RECENCY_DAYS: u32 = 14;
pub const DEFAULT_RESULT_LIMIT: usize = 5;
pub const DEFAULT_TOP_COMPANIES_QUERY: &str = "Top companies in stock market today";

/// Thin wrapper over a [`SearchProvider`].
///
/// Failures never escape as errors: they become an empty result list plus
/// the structured error on the [`NewsResponse`].
#[derive(Clone)]
pub struct NewsFetcher {
    provider: Option<Arc<dyn SearchProvider>>,
    recency_days: u32,
}

impl NewsFetcher {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            provider: Some(provider),
            recency_days: DEFAULT_RECENCY_DAYS,
        }
    }

    /// Fetcher with no backend; every search reports the missing provider.
    pub fn unconfigured() -> Self {
        Self {
            provider: None,
            recency_days: DEFAULT_RECENCY_DAYS,
        }
    }

    pub fn with_recency_days(mut self, days: u32) -> Self {
        self.recency_days = days.max(1);
        self
    }

    pub fn recency_days(&self) -> u32 {
        self.recency_days
    }

    /// The query string sent for a news search about `subject`.
    pub fn news_query(&self, subject: &str) -> String {
        format!(
            "Latest stock news for {} (past {} days)",
            subject.trim(),
            self.recency_days
        )
    }

    /// Recent news about a ticker or free-text subject.
    pub async fn search_news(&self, subject: &str, limit: usize) -> NewsResponse {
        let request = SearchRequest {
            query: self.news_query(subject),
            max_results: limit,
            days: Some(self.recency_days),
            topic: SearchTopic::News,
        };
        self.run(request).await
    }

    /// Recent news about a resolved symbol; an unresolved one falls back
    /// to its original text.
    pub async fn search_news_for(&self, symbol: &ResolvedSymbol, limit: usize) -> NewsResponse {
        match symbol {
            ResolvedSymbol::Resolved(symbol) => self.search_news(&symbol.ticker, limit).await,
            ResolvedSymbol::Unresolved { query } => self.search_news(query, limit).await,
        }
    }

    /// Plain web search, no recency phrase.
    pub async fn search_web(&self, query: &str, limit: usize) -> NewsResponse {
        let query = match query.trim() {
            "" => DEFAULT_TOP_COMPANIES_QUERY,
            trimmed => trimmed,
        };
        let request = SearchRequest {
            query: query.to_string(),
            max_results: limit,
            days: None,
            topic: SearchTopic::General,
        };
        self.run(request).await
    }

    async fn run(&self, request: SearchRequest) -> NewsResponse {
        if request.max_results == 0 {
            return NewsResponse::ok(request.query, Vec::new());
        }

        let Some(provider) = &self.provider else {
            return NewsResponse::failed(request.query, MarketDataError::NoProvidersAvailable);
        };

        match provider.search(&request).await {
            Ok(mut results) => {
                results.truncate(request.max_results);
                debug!(
                    "{} returned {} results for '{}'",
                    provider.id(),
                    results.len(),
                    request.query
                );
                NewsResponse::ok(request.query, results)
            }
            Err(e) => {
                warn!("Search via {} failed for '{}': {}", provider.id(), request.query, e);
                NewsResponse::failed(request.query, e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::models::{ResolutionSource, SearchResult};

    struct MockSearch {
        results: usize,
        fail: bool,
        calls: AtomicUsize,
        requests: Mutex<Vec<SearchRequest>>,
    }

    impl MockSearch {
        fn returning(results: usize) -> Arc<Self> {
            Arc::new(Self {
                results,
                fail: false,
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                results: 0,
                fail: true,
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn last_request(&self) -> SearchRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl SearchProvider for MockSearch {
        fn id(&self) -> &'static str {
            "MOCK"
        }

        async fn search(
            &self,
            request: &SearchRequest,
        ) -> Result<Vec<SearchResult>, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(MarketDataError::Transport {
                    provider: "MOCK".to_string(),
                    message: "Request timed out".to_string(),
                });
            }
            // Ignores max_results, like a provider that over-delivers
            Ok((0..self.results)
                .map(|i| {
                    SearchResult::new(
                        format!("title {}", i),
                        format!("snippet {}", i),
                        format!("https://example.com/{}", i),
                    )
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_truncates_to_limit_preserving_order() {
        let provider = MockSearch::returning(8);
        let fetcher = NewsFetcher::new(provider.clone());

        let response = fetcher.search_news("NVDA", 3).await;
        let titles: Vec<&str> = response.results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["title 0", "title 1", "title 2"]);
        assert!(response.error.is_none());
        assert_eq!(provider.last_request().max_results, 3);
    }

    #[tokio::test]
    async fn test_news_query_and_recency() {
        let provider = MockSearch::returning(1);
        let fetcher = NewsFetcher::new(provider.clone());

        let response = fetcher.search_news(" NVDA ", 3).await;
        assert_eq!(response.query, "Latest stock news for NVDA (past 14 days)");
        let request = provider.last_request();
        assert_eq!(request.days, Some(14));
        assert_eq!(request.topic, SearchTopic::News);

        let fetcher = NewsFetcher::new(provider.clone()).with_recency_days(7);
        assert_eq!(
            fetcher.search_news("TSLA", 1).await.query,
            "Latest stock news for TSLA (past 7 days)"
        );
    }

    #[tokio::test]
    async fn test_zero_limit_makes_no_call() {
        let provider = MockSearch::returning(5);
        let fetcher = NewsFetcher::new(provider.clone());

        let response = fetcher.search_news("AAPL", 0).await;
        assert!(response.results.is_empty());
        assert!(response.error.is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_is_empty_with_error() {
        let fetcher = NewsFetcher::new(MockSearch::failing());

        let response = fetcher.search_news("AAPL", 3).await;
        assert!(response.results.is_empty());
        match response.error {
            Some(MarketDataError::Transport { provider, message }) => {
                assert_eq!(provider, "MOCK");
                assert_eq!(message, "Request timed out");
            }
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_reports_error() {
        let response = NewsFetcher::unconfigured().search_web("", 5).await;
        assert_eq!(response.query, DEFAULT_TOP_COMPANIES_QUERY);
        assert!(response.results.is_empty());
        assert_eq!(response.error, Some(MarketDataError::NoProvidersAvailable));
    }

    #[tokio::test]
    async fn test_search_web_uses_raw_query() {
        let provider = MockSearch::returning(10);
        let fetcher = NewsFetcher::new(provider.clone());

        let response = fetcher.search_web("largest EV makers", 5).await;
        assert_eq!(response.query, "largest EV makers");
        assert_eq!(response.results.len(), 5);
        let request = provider.last_request();
        assert_eq!(request.topic, SearchTopic::General);
        assert_eq!(request.days, None);
    }

    #[tokio::test]
    async fn test_search_news_for_symbol() {
        let provider = MockSearch::returning(1);
        let fetcher = NewsFetcher::new(provider.clone());

        let symbol = ResolvedSymbol::ticker("NVDA", ResolutionSource::AliasTable);
        let response = fetcher.search_news_for(&symbol, 1).await;
        assert_eq!(response.query, "Latest stock news for NVDA (past 14 days)");

        let unresolved = ResolvedSymbol::unresolved("Acme Widgets");
        let response = fetcher.search_news_for(&unresolved, 1).await;
        assert_eq!(
            response.query,
            "Latest stock news for Acme Widgets (past 14 days)"
        );
    }
}
