//! Media matchmaker: request building, dispatch and normalization for a remote
//! book / movie / TV show recommendation API, served to a single-page front end.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use config::{ApiKey, ClientConfig, Config};
pub use error::{AppError, AppResult, ErrorKind};
pub use models::{MediaType, SearchQuery, SearchResult, SimilarityType};
