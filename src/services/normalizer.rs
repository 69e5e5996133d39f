//! Maps raw recommendation payloads into `SearchResult`s.
//!
//! Normalization is pure: the same payload always yields the same results,
//! one per input element, in input order. Only the envelope is validated;
//! individual entries are never rejected.

use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{
        BookDetails, BookResponse, MediaDetails, MediaType, ScreenDetails, SearchResult,
        SimilarityType, VideoResponse,
    },
};

const UNKNOWN_TITLE: &str = "Unknown";

/// Normalizes a payload for the given media type's family
pub fn normalize(media_type: MediaType, payload: &Value) -> AppResult<Vec<SearchResult>> {
    if media_type.is_screen() {
        normalize_videos(media_type, payload)
    } else {
        normalize_books(payload)
    }
}

pub fn normalize_books(payload: &Value) -> AppResult<Vec<SearchResult>> {
    let entries = results_array(payload, "books")?;

    Ok(entries
        .iter()
        .enumerate()
        .map(|(position, entry)| book_result(position, BookResponse::from_value(entry)))
        .collect())
}

/// `requested` is used when an entry does not say whether it is a movie or a show
pub fn normalize_videos(requested: MediaType, payload: &Value) -> AppResult<Vec<SearchResult>> {
    let entries = results_array(payload, "videos")?;

    Ok(entries
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            video_result(position, requested, VideoResponse::from_value(entry))
        })
        .collect())
}

fn results_array<'a>(payload: &'a Value, key: &str) -> AppResult<&'a Vec<Value>> {
    match payload.get(key) {
        Some(Value::Array(entries)) => Ok(entries),
        Some(_) => Err(AppError::api(format!(
            "Invalid response format: `{}` is not an array",
            key
        ))),
        None => Err(AppError::api(format!(
            "Invalid response format: missing `{}` array",
            key
        ))),
    }
}

fn book_result(position: usize, raw: BookResponse) -> SearchResult {
    let title = raw.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    SearchResult {
        id: result_id(position, &title),
        media_type: MediaType::Book,
        year: raw.publication_year.and_then(year),
        genre: pick_genres(raw.genre, raw.genres),
        similarity_type: SimilarityType::from_loose(raw.similarity_type.as_deref()),
        similarity_justification: raw.explanation.unwrap_or_default(),
        details: raw.plot_summary.unwrap_or_default(),
        content_advisories: raw.content_advisories,
        awards: raw.awards,
        media: MediaDetails::Book(BookDetails {
            author: raw.author,
            goodreads_rating: raw.goodreads_rating.and_then(rating),
            storygraph_rating: raw.storygraph_rating.and_then(rating),
            page_count: raw.page_count.and_then(positive_u32),
            series_info: raw.series_info,
            audiobook_available: raw.audiobook_available,
            diversity_highlight: raw.diversity_highlight,
            upcoming_adaptations: raw.upcoming_adaptations,
            trigger_warnings: raw.trigger_warnings,
            subgenres: raw.subgenres,
            similar_authors: raw.similar_authors,
        }),
        title,
    }
}

fn video_result(position: usize, requested: MediaType, raw: VideoResponse) -> SearchResult {
    let title = raw.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string());
    let media_type = raw
        .video_type
        .as_deref()
        .and_then(screen_media_type)
        .unwrap_or(requested);

    SearchResult {
        id: result_id(position, &title),
        media_type,
        year: raw.release_year.and_then(year),
        genre: pick_genres(raw.genre, raw.genres),
        similarity_type: SimilarityType::from_loose(raw.similarity_type.as_deref()),
        similarity_justification: raw.explanation.unwrap_or_default(),
        details: raw.plot_summary.unwrap_or_default(),
        content_advisories: raw.content_advisories,
        awards: raw.awards,
        media: MediaDetails::Screen(ScreenDetails {
            video_type: raw.video_type,
            directors: raw.directors,
            actors: raw.actors,
            imdb_rating: raw.imdb_rating.and_then(rating),
            tmdb_rating: raw.tmdb_rating.and_then(rating),
            runtime: raw.runtime.and_then(positive_u32),
            seasons: raw.series_season,
            streaming_services: raw.streaming_services,
            similar_videos: raw.similar_videos,
        }),
        title,
    }
}

fn screen_media_type(label: &str) -> Option<MediaType> {
    match label.parse::<MediaType>() {
        Ok(media_type) if media_type.is_screen() => Some(media_type),
        _ => None,
    }
}

fn pick_genres(genre: Vec<String>, genres: Vec<String>) -> Vec<String> {
    if genre.is_empty() {
        genres
    } else {
        genre
    }
}

fn result_id(position: usize, title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');

    if slug.is_empty() {
        position.to_string()
    } else {
        format!("{}-{}", position, slug)
    }
}

// 0 means "unknown" upstream, so it is treated as absent
fn year(raw: i64) -> Option<i32> {
    i32::try_from(raw).ok().filter(|y| *y > 0)
}

fn positive_u32(raw: i64) -> Option<u32> {
    u32::try_from(raw).ok().filter(|n| *n > 0)
}

fn rating(raw: f64) -> Option<f64> {
    (raw.is_finite() && raw >= 0.0).then_some(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_dune_messiah_scenario() {
        let payload = json!({
            "books": [{
                "title": "Dune Messiah",
                "publication_year": "1969",
                "genre": ["sci-fi"],
                "similarity_type": "plot & characters",
                "explanation": "sequel themes"
            }]
        });

        let results = normalize_books(&payload).unwrap();

        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert_eq!(result.title, "Dune Messiah");
        assert_eq!(result.year, Some(1969));
        assert_eq!(result.genre, vec!["sci-fi".to_string()]);
        assert_eq!(result.similarity_justification, "sequel themes");
        assert_eq!(result.similarity_type, SimilarityType::PlotAndCharacters);
        assert_eq!(result.media_type, MediaType::Book);
        assert_eq!(result.id, "0-dune-messiah");
    }

    #[test]
    fn test_books_count_and_order_preserved() {
        let payload = json!({
            "books": [
                {"title": "A"},
                {"title": "B"},
                "garbage",
                {"title": "A"},
                null
            ]
        });

        let results = normalize_books(&payload).unwrap();
        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "Unknown", "A", "Unknown"]);

        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["0-a", "1-b", "2-unknown", "3-a", "4-unknown"]);
    }

    #[test]
    fn test_empty_books_array() {
        let results = normalize_books(&json!({"books": []})).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_missing_books_key_is_api_error() {
        let err = normalize_books(&json!({"videos": []})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ApiError);
        assert!(err.to_string().contains("books"));
    }

    #[test]
    fn test_books_not_an_array_is_api_error() {
        let err = normalize_books(&json!({"books": {"title": "Dune"}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ApiError);
    }

    #[test]
    fn test_non_object_payload_is_api_error() {
        let err = normalize(MediaType::Movie, &json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ApiError);
    }

    #[test]
    fn test_unknown_similarity_type_defaults() {
        let payload = json!({"books": [{"title": "X", "similarity_type": "foo"}]});
        let results = normalize_books(&payload).unwrap();
        assert_eq!(results[0].similarity_type, SimilarityType::PlotAndCharacters);
    }

    #[test]
    fn test_non_numeric_year_is_absent() {
        let payload = json!({"books": [{"title": "X", "publication_year": "not-a-number"}]});
        let results = normalize_books(&payload).unwrap();
        assert_eq!(results[0].year, None);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let results = normalize_books(&json!({"books": [{}]})).unwrap();
        let result = &results[0];

        assert_eq!(result.title, "Unknown");
        assert_eq!(result.year, None);
        assert!(result.genre.is_empty());
        assert!(result.content_advisories.is_empty());
        assert!(result.awards.is_empty());
        assert_eq!(result.similarity_justification, "");
        assert_eq!(result.details, "");

        let book = result.as_book().unwrap();
        assert_eq!(book.author, None);
        assert_eq!(book.goodreads_rating, None);
        assert!(book.trigger_warnings.is_empty());
    }

    #[test]
    fn test_invalid_ratings_are_dropped() {
        let payload = json!({
            "books": [{
                "goodreads_rating": -1.0,
                "storygraph_rating": "4.3",
                "page_count": "0"
            }]
        });

        let results = normalize_books(&payload).unwrap();
        let book = results[0].as_book().unwrap();
        assert_eq!(book.goodreads_rating, None);
        assert_eq!(book.storygraph_rating, Some(4.3));
        assert_eq!(book.page_count, None);
    }

    #[test]
    fn test_book_details_carried_through() {
        let payload = json!({
            "books": [{
                "title": "The Fifth Season",
                "author": "N. K. Jemisin",
                "genre": "Fantasy",
                "page_count": "468 pages",
                "audiobook_available": "yes",
                "series_info": "The Broken Earth #1",
                "diversity_highlight": "Black woman author",
                "trigger_warnings": ["violence"],
                "similar_authors": ["Octavia E. Butler"],
                "awards": ["Hugo Award 2016"],
                "similarity_type": "Author & Writing Style",
                "plot_summary": "The world ends, again."
            }]
        });

        let results = normalize_books(&payload).unwrap();
        let result = &results[0];
        assert_eq!(result.genre, vec!["Fantasy".to_string()]);
        assert_eq!(result.awards, vec!["Hugo Award 2016".to_string()]);
        assert_eq!(result.details, "The world ends, again.");
        assert_eq!(result.similarity_type, SimilarityType::AuthorAndWritingStyle);

        let book = result.as_book().unwrap();
        assert_eq!(book.author.as_deref(), Some("N. K. Jemisin"));
        assert_eq!(book.page_count, Some(468));
        assert_eq!(book.audiobook_available, Some(true));
        assert_eq!(book.similar_authors, vec!["Octavia E. Butler".to_string()]);
    }

    #[test]
    fn test_videos_count_and_order_preserved() {
        let payload = json!({
            "videos": [
                {"title": "Alien", "type": "Movie", "release_year": 1979},
                {"title": "Aliens", "type": "Movie", "release_year": "1986"},
                {"title": "Alien: Earth", "type": "TV Show"}
            ]
        });

        let results = normalize_videos(MediaType::Movie, &payload).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].title, "Alien");
        assert_eq!(results[1].year, Some(1986));
        assert_eq!(results[2].media_type, MediaType::TvShow);
        assert!(results.iter().all(|r| r.as_screen().is_some()));
    }

    #[test]
    fn test_video_media_type_falls_back_to_requested() {
        let payload = json!({"videos": [{"title": "Dark"}, {"title": "Up", "type": "Documentary"}]});
        let results = normalize(MediaType::TvShow, &payload).unwrap();
        assert_eq!(results[0].media_type, MediaType::TvShow);
        assert_eq!(results[1].media_type, MediaType::TvShow);
    }

    #[test]
    fn test_missing_videos_key_is_api_error() {
        let err = normalize(MediaType::Movie, &json!({"books": []})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ApiError);
        assert!(err.to_string().contains("videos"));
    }

    #[test]
    fn test_video_details_carried_through() {
        let payload = json!({
            "videos": [{
                "title": "Arrival",
                "type": "Movie",
                "imdb_rating": "7.9",
                "tmdb_rating": 7.6,
                "runtime": "116 min",
                "directors": ["Denis Villeneuve"],
                "actors": ["Amy Adams", "Jeremy Renner"],
                "streaming_services": ["Paramount+"],
                "similarity_type": "genre and themes",
                "explanation": "cerebral first contact"
            }]
        });

        let results = normalize_videos(MediaType::Movie, &payload).unwrap();
        let result = &results[0];
        assert_eq!(result.similarity_type, SimilarityType::GenreAndThemes);

        let screen = result.as_screen().unwrap();
        assert_eq!(screen.imdb_rating, Some(7.9));
        assert_eq!(screen.tmdb_rating, Some(7.6));
        assert_eq!(screen.runtime, Some(116));
        assert_eq!(screen.directors, vec!["Denis Villeneuve".to_string()]);
        assert_eq!(screen.actors.len(), 2);
        assert_eq!(screen.streaming_services, vec!["Paramount+".to_string()]);
    }

    #[test]
    fn test_genres_key_used_when_genre_missing() {
        let payload = json!({"videos": [{"title": "Heat", "genres": ["Crime"]}]});
        let results = normalize_videos(MediaType::Movie, &payload).unwrap();
        assert_eq!(results[0].genre, vec!["Crime".to_string()]);
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let payload = json!({
            "books": [{"title": "Piranesi", "goodreads_rating": 4.2}, {"title": "Jonathan Strange"}]
        });
        assert_eq!(
            normalize_books(&payload).unwrap(),
            normalize_books(&payload).unwrap()
        );
    }

    #[test]
    fn test_result_id_slug() {
        assert_eq!(result_id(3, "Alien: Earth"), "3-alien-earth");
        assert_eq!(result_id(0, "  !!  "), "0");
        assert_eq!(result_id(1, "Café Society"), "1-café-society");
    }
}
