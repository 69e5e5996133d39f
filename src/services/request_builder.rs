use std::fmt::Display;

use crate::models::{wire::RequestBody, MediaType, SearchQuery};

/// Recommendation API endpoint families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    BookRecommendations,
    BookCustom,
    VideoRecommendations,
    VideoCustom,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::BookRecommendations => "/books/recommendations",
            Endpoint::BookCustom => "/books/recommendations/custom",
            Endpoint::VideoRecommendations => "/videos/recommendations",
            Endpoint::VideoCustom => "/videos/recommendations/custom",
        }
    }

    /// Key of the result array in this endpoint's response
    pub fn results_key(&self) -> &'static str {
        match self {
            Endpoint::BookRecommendations | Endpoint::BookCustom => "books",
            Endpoint::VideoRecommendations | Endpoint::VideoCustom => "videos",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// A fully resolved outgoing call: where to POST and what to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRequest {
    pub endpoint: Endpoint,
    pub body: RequestBody,
}

impl RecommendationRequest {
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.endpoint.path())
    }
}

/// Selects endpoint and body shape for a search
pub fn build_request(query: &SearchQuery) -> RecommendationRequest {
    let text = query.query.trim().to_string();

    match (query.media_type, query.is_custom_prompt) {
        (MediaType::Book, true) => RecommendationRequest {
            endpoint: Endpoint::BookCustom,
            body: RequestBody::Prompt { prompt: text },
        },
        (MediaType::Book, false) => RecommendationRequest {
            endpoint: Endpoint::BookRecommendations,
            body: RequestBody::BookTitle { title: text },
        },
        (_, true) => RecommendationRequest {
            endpoint: Endpoint::VideoCustom,
            body: RequestBody::Prompt { prompt: text },
        },
        (media_type, false) => RecommendationRequest {
            endpoint: Endpoint::VideoRecommendations,
            body: RequestBody::VideoTitle {
                title: text,
                media_type: media_type.wire_label().to_string(),
            },
        },
    }
}
