/// Recommendation API provider over HTTP
///
/// API Flow:
/// 1. Build: `SearchQuery` → endpoint + JSON body (title or custom prompt)
/// 2. POST with `X-API-Key`, bounded by the configured timeout
/// 3. Normalize the `books` / `videos` array into `SearchResult`s
use crate::{
    config::ClientConfig,
    error::{AppError, AppResult},
    models::{SearchQuery, SearchResult},
    services::{
        cancel::CancelToken,
        normalizer,
        providers::RecommendationProvider,
        request_builder::{build_request, RecommendationRequest},
    },
};
use reqwest::{header::CONTENT_TYPE, Client as HttpClient};

const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Clone)]
pub struct HttpRecommendationProvider {
    http_client: HttpClient,
    config: ClientConfig,
}

impl HttpRecommendationProvider {
    /// Creates a provider from validated settings
    pub fn new(config: ClientConfig) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    async fn dispatch(&self, request: &RecommendationRequest) -> AppResult<serde_json::Value> {
        let url = request.url(self.config.base_url());

        tracing::debug!(
            url = %url,
            endpoint = %request.endpoint,
            "Sending recommendation request"
        );

        let response = self
            .http_client
            .post(&url)
            .header(API_KEY_HEADER, self.config.api_key().expose())
            .header(CONTENT_TYPE, "application/json")
            .json(&request.body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            // Keep the error body for the message; it is truncated there
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = %status,
                endpoint = %request.endpoint,
                "Recommendation API returned an error status"
            );
            return Err(AppError::api_status(status, &body));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                endpoint = %request.endpoint,
                "Failed to parse recommendation response"
            );
            AppError::from(e)
        })
    }
}

#[async_trait::async_trait]
impl RecommendationProvider for HttpRecommendationProvider {
    async fn search(
        &self,
        query: &SearchQuery,
        cancel: &CancelToken,
    ) -> AppResult<Vec<SearchResult>> {
        query.validate()?;

        if cancel.is_cancelled() {
            return Err(AppError::Cancelled(
                "search was cancelled before it started".to_string(),
            ));
        }

        let request = build_request(query);

        // Cancellation wins ties so a superseded search never normalizes
        let payload = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(media_type = %query.media_type, "Recommendation request cancelled");
                return Err(AppError::Cancelled("search was cancelled".to_string()));
            }
            payload = self.dispatch(&request) => payload?,
        };

        // Convert the raw array to our format
        let results = normalizer::normalize(query.media_type, &payload)?;

        tracing::info!(
            media_type = %query.media_type,
            custom_prompt = query.is_custom_prompt,
            results = results.len(),
            provider = self.name(),
            "Recommendations fetched"
        );

        Ok(results)
    }

    fn name(&self) -> &'static str {
        "recommendation_api"
    }
}
