use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::{AppError, AppResult};

mod lenient;
pub mod search_result;
pub mod wire;

pub use search_result::{BookDetails, MediaDetails, ScreenDetails, SearchResult};
pub use wire::{BookResponse, VideoResponse};

/// Media category a search targets
///
/// Deserialization goes through `FromStr`, so every spelling it accepts
/// ("TV Show", "tv-show", "series", ...) works in JSON too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum MediaType {
    #[serde(rename = "book")]
    Book,
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv show")]
    TvShow,
}

impl MediaType {
    /// Movies and TV shows share the video endpoints and response shape
    pub fn is_screen(&self) -> bool {
        !matches!(self, MediaType::Book)
    }

    /// Label the recommendation API expects in `media_type`
    pub fn wire_label(&self) -> &'static str {
        match self {
            MediaType::Book => "Book",
            MediaType::Movie => "Movie",
            MediaType::TvShow => "TV Show",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Book => "book",
            MediaType::Movie => "movie",
            MediaType::TvShow => "tv show",
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect();

        match normalized.as_str() {
            "book" | "books" => Ok(MediaType::Book),
            "movie" | "movies" | "film" => Ok(MediaType::Movie),
            "tvshow" | "tvshows" | "tv" | "series" | "tvseries" => Ok(MediaType::TvShow),
            _ => Err(AppError::InvalidInput(format!("Unknown media type '{}'", s))),
        }
    }
}

impl TryFrom<String> for MediaType {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Why a result was recommended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimilarityType {
    #[serde(rename = "genre & themes")]
    GenreAndThemes,
    #[serde(rename = "author & writing style")]
    AuthorAndWritingStyle,
    #[serde(rename = "plot & characters")]
    PlotAndCharacters,
}

impl SimilarityType {
    /// Case-insensitive match against the known labels; unknown or missing
    /// labels fall back to plot & characters
    pub fn from_loose(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return SimilarityType::PlotAndCharacters;
        };

        let collapsed = raw
            .to_lowercase()
            .split_whitespace()
            .map(|word| if word == "and" { "&" } else { word })
            .collect::<Vec<_>>()
            .join(" ");

        match collapsed.as_str() {
            "genre & themes" => SimilarityType::GenreAndThemes,
            "author & writing style" => SimilarityType::AuthorAndWritingStyle,
            _ => SimilarityType::PlotAndCharacters,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityType::GenreAndThemes => "genre & themes",
            SimilarityType::AuthorAndWritingStyle => "author & writing style",
            SimilarityType::PlotAndCharacters => "plot & characters",
        }
    }
}

impl Display for SimilarityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-initiated search: a title (or free-form question) for one media type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub media_type: MediaType,
    #[serde(default)]
    pub is_custom_prompt: bool,
}

impl SearchQuery {
    pub fn title(query: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            query: query.into(),
            media_type,
            is_custom_prompt: false,
        }
    }

    pub fn custom_prompt(prompt: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            query: prompt.into(),
            media_type,
            is_custom_prompt: true,
        }
    }

    /// Rejects queries that would only waste a call to the recommendation API
    pub fn validate(&self) -> AppResult<()> {
        if self.query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
