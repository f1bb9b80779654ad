//! News and web search fetching.
//!
//! - `traits` - The `SearchProvider` backend trait and request type
//! - `tavily` - Tavily search client
//! - `fetcher` - `NewsFetcher`: query phrasing, recency window, limit, error folding

mod fetcher;
mod tavily;
mod traits;

pub use fetcher::{
    NewsFetcher, DEFAULT_RECENCY_DAYS, DEFAULT_RESULT_LIMIT, DEFAULT_TOP_COMPANIES_QUERY,
};
pub use tavily::TavilySearchProvider;
pub use traits::{SearchProvider, SearchRequest, SearchTopic};
