use serde::Serialize;

use super::{MediaType, SimilarityType};

/// One normalized recommendation, as handed to the presentation layer
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Position-qualified id, unique within one result set
    pub id: String,
    pub title: String,
    pub media_type: MediaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub genre: Vec<String>,
    pub similarity_type: SimilarityType,
    pub similarity_justification: String,
    /// Plot summary
    pub details: String,
    pub content_advisories: Vec<String>,
    pub awards: Vec<String>,
    #[serde(flatten)]
    pub media: MediaDetails,
}

/// Fields that only make sense for one media family
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "variant", rename_all = "camelCase")]
pub enum MediaDetails {
    Book(BookDetails),
    Screen(ScreenDetails),
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goodreads_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storygraph_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audiobook_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diversity_highlight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upcoming_adaptations: Option<String>,
    pub trigger_warnings: Vec<String>,
    pub subgenres: Vec<String>,
    pub similar_authors: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScreenDetails {
    /// Raw `type` label from the API ("Movie", "TV Show")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_type: Option<String>,
    pub directors: Vec<String>,
    pub actors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_rating: Option<f64>,
    /// Minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasons: Option<String>,
    pub streaming_services: Vec<String>,
    pub similar_videos: Vec<String>,
}

impl SearchResult {
    pub fn as_book(&self) -> Option<&BookDetails> {
        match &self.media {
            MediaDetails::Book(book) => Some(book),
            MediaDetails::Screen(_) => None,
        }
    }

    pub fn as_screen(&self) -> Option<&ScreenDetails> {
        match &self.media {
            MediaDetails::Screen(screen) => Some(screen),
            MediaDetails::Book(_) => None,
        }
    }
}
