/// Recommendation provider abstraction
///
/// The recommendation logic itself lives behind a remote API. A provider turns a
/// `SearchQuery` into normalized `SearchResult`s; the HTTP provider is the only
/// production implementation, and route tests substitute a mock.
use crate::{
    error::AppResult,
    models::{SearchQuery, SearchResult},
    services::cancel::CancelToken,
};

pub mod http;

pub use http::HttpRecommendationProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationProvider: Send + Sync {
    /// Runs one search.
    ///
    /// Returns the normalized results (possibly empty) or a typed error; failures
    /// are never turned into an empty list. Resolves with `AppError::Cancelled`
    /// as soon as `cancel` fires.
    async fn search(
        &self,
        query: &SearchQuery,
        cancel: &CancelToken,
    ) -> AppResult<Vec<SearchResult>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
