use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;

// ============================================================================
// Recommendation API request bodies
// ============================================================================

/// JSON body POSTed to the recommendation API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestBody {
    /// Free-form question, used by the custom endpoints
    Prompt { prompt: String },
    /// Title lookup for books
    BookTitle { title: String },
    /// Title lookup for movies and TV shows
    VideoTitle { title: String, media_type: String },
}

// ============================================================================
// Recommendation API response records
// ============================================================================

/// Raw book entry from the `books` array. Every field is optional and
/// deserialization of an object never fails.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookResponse {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub publication_year: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub genre: Vec<String>,
    /// Older payloads used `genres`
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub subgenres: Vec<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub goodreads_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub storygraph_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub page_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub plot_summary: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub content_advisories: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub awards: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub series_info: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub similar_authors: Vec<String>,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub audiobook_available: Option<bool>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub upcoming_adaptations: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub similarity_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub explanation: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub diversity_highlight: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub trigger_warnings: Vec<String>,
}

/// Raw movie / TV show entry from the `videos` array
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoResponse {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient::string")]
    pub video_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub release_year: Option<i64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub imdb_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub tmdb_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub genre: Vec<String>,
    /// Older payloads used `genres`
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub similarity_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub explanation: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub plot_summary: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub directors: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub actors: Vec<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub runtime: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub content_advisories: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub awards: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub series_season: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub similar_videos: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub streaming_services: Vec<String>,
}

impl BookResponse {
    /// Non-object entries become an all-defaults record rather than an error
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

impl VideoResponse {
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}
