use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{MediaType, SearchQuery, SearchResult},
    routes::AppState,
    services::{CancelToken, SearchOutcome},
};

/// Header that scopes last-request-wins sessions to one front end instance
pub const CLIENT_ID_HEADER: &str = "x-client-id";

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub media_type: MediaType,
    #[serde(default)]
    pub is_custom_prompt: bool,
}

impl SearchRequest {
    fn into_query(self) -> AppResult<SearchQuery> {
        let query = SearchQuery {
            query: self.query,
            media_type: self.media_type,
            is_custom_prompt: self.is_custom_prompt,
        };
        query.validate()?;
        Ok(query)
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub count: usize,
    pub media_type: MediaType,
    pub fetched_at: DateTime<Utc>,
}

/// Handler for the search endpoint
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> AppResult<Json<SearchResponse>> {
    // Unknown media types fail here as INVALID_INPUT rather than axum's 422
    let Json(request) = payload?;
    let query = request.into_query()?;

    tracing::info!(
        request_id = %request_id,
        media_type = %query.media_type,
        custom_prompt = query.is_custom_prompt,
        "Processing search request"
    );

    let client_id = headers
        .get(CLIENT_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty());

    let results = match client_id {
        Some(client_id) => {
            let session = state.session(client_id);
            match session.search(state.provider.as_ref(), &query).await? {
                SearchOutcome::Current(results) => results,
                SearchOutcome::Stale { sequence } => {
                    tracing::info!(
                        request_id = %request_id,
                        sequence = sequence,
                        "Search superseded by a newer request"
                    );
                    return Err(AppError::Cancelled(
                        "superseded by a newer search".to_string(),
                    ));
                }
            }
        }
        None => {
            state
                .provider
                .search(&query, &CancelToken::never())
                .await?
        }
    };

    tracing::info!(
        request_id = %request_id,
        results = results.len(),
        "Search completed"
    );

    Ok(Json(SearchResponse {
        count: results.len(),
        results,
        media_type: query.media_type,
        fetched_at: Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        models::{BookDetails, MediaDetails, SimilarityType},
        routes::create_router,
        services::providers::MockRecommendationProvider,
    };
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn dune_messiah() -> SearchResult {
        SearchResult {
            id: "0-dune-messiah".to_string(),
            title: "Dune Messiah".to_string(),
            media_type: MediaType::Book,
            year: Some(1969),
            genre: vec!["sci-fi".to_string()],
            similarity_type: SimilarityType::PlotAndCharacters,
            similarity_justification: "sequel themes".to_string(),
            details: String::new(),
            content_advisories: vec![],
            awards: vec![],
            media: MediaDetails::Book(BookDetails::default()),
        }
    }

    async fn post_search(
        provider: MockRecommendationProvider,
        body: Value,
    ) -> (StatusCode, Value) {
        let app = create_router(Arc::new(AppState::new(Arc::new(provider))));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/search")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_search_request_into_query() {
        let request: SearchRequest =
            serde_json::from_value(json!({"query": "Severance", "media_type": "TV Show"}))
                .unwrap();
        let query = request.into_query().unwrap();
        assert_eq!(query.media_type, MediaType::TvShow);
        assert!(!query.is_custom_prompt);
    }

    #[test]
    fn test_search_request_rejects_blank_query() {
        let request = SearchRequest {
            query: " ".to_string(),
            media_type: MediaType::Book,
            is_custom_prompt: false,
        };
        assert_eq!(request.into_query().unwrap_err().kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_search_unknown_media_type_is_bad_request() {
        let mut provider = MockRecommendationProvider::new();
        provider.expect_search().times(0);

        let (status, body) =
            post_search(provider, json!({"query": "Serial", "media_type": "podcast"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "INVALID_INPUT");
        assert!(body["error"].as_str().unwrap().contains("podcast"));
    }

    #[tokio::test]
    async fn test_search_returns_normalized_results() {
        let mut provider = MockRecommendationProvider::new();
        provider
            .expect_search()
            .withf(|query, _| {
                query.query == "Dune" && query.media_type == MediaType::Book && !query.is_custom_prompt
            })
            .times(1)
            .returning(|_, _| Ok(vec![dune_messiah()]));

        let (status, body) =
            post_search(provider, json!({"query": "Dune", "media_type": "book"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["media_type"], "book");
        assert_eq!(body["results"][0]["title"], "Dune Messiah");
        assert_eq!(body["results"][0]["year"], 1969);
        assert!(body["fetched_at"].is_string());
    }

    #[tokio::test]
    async fn test_client_session_released_after_search() {
        let mut provider = MockRecommendationProvider::new();
        provider
            .expect_search()
            .times(1)
            .returning(|_, _| Ok(vec![dune_messiah()]));

        let state = Arc::new(AppState::new(Arc::new(provider)));
        let response = create_router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/search")
                    .header("content-type", "application/json")
                    .header(CLIENT_ID_HEADER, "tab-1")
                    .body(Body::from(
                        json!({"query": "Dune", "media_type": "book"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.active_sessions(), 0);
    }

    #[tokio::test]
    async fn test_search_empty_query_is_bad_request() {
        let mut provider = MockRecommendationProvider::new();
        provider.expect_search().times(0);

        let (status, body) =
            post_search(provider, json!({"query": "  ", "media_type": "movie"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_search_surfaces_provider_errors() {
        let mut provider = MockRecommendationProvider::new();
        provider.expect_search().returning(|_, _| {
            Err(AppError::api_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                "upstream exploded",
            ))
        });

        let (status, body) = post_search(
            provider,
            json!({"query": "books about AI", "media_type": "book", "is_custom_prompt": true}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["kind"], "API_ERROR");
        assert!(body["error"].as_str().unwrap().contains("500"));
    }
}
