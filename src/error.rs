use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::fmt::Display;

/// Upstream error bodies are cut to this many characters in messages
pub const MAX_ERROR_BODY_CHARS: usize = 512;

/// Boxed underlying error kept for diagnostics
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Classification of a failed search, as reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    ConfigError,
    ApiError,
    NetworkError,
    InvalidInput,
    Cancelled,
    UnknownError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ErrorKind::ConfigError => "CONFIG_ERROR",
            ErrorKind::ApiError => "API_ERROR",
            ErrorKind::NetworkError => "NETWORK_ERROR",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::Cancelled => "CANCELLED",
            ErrorKind::UnknownError => "UNKNOWN_ERROR",
        };
        f.write_str(label)
    }
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Base URL or API key missing or unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// The recommendation API answered, but not with something usable
    #[error("Recommendation API error: {message}")]
    Api {
        status: Option<StatusCode>,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Transport-level failure (unreachable host, reset, timeout)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The search was cancelled or superseded by a newer one
    #[error("Search cancelled: {0}")]
    Cancelled(String),

    #[error("Unexpected error: {message}")]
    Unknown {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl AppError {
    pub fn api(message: impl Into<String>) -> Self {
        AppError::Api {
            status: None,
            message: message.into(),
            source: None,
        }
    }

    /// Error for a non-2xx answer; the status is always part of the message
    pub fn api_status(status: StatusCode, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            format!("API returned status {}", status)
        } else if body.chars().count() > MAX_ERROR_BODY_CHARS {
            let head: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            format!("API returned status {}: {}...", status, head)
        } else {
            format!("API returned status {}: {}", status, body)
        };

        AppError::Api {
            status: Some(status),
            message,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Config(_) => ErrorKind::ConfigError,
            AppError::Api { .. } => ErrorKind::ApiError,
            AppError::Network(_) => ErrorKind::NetworkError,
            AppError::InvalidInput(_) => ErrorKind::InvalidInput,
            AppError::Cancelled(_) => ErrorKind::Cancelled,
            AppError::Unknown { .. } => ErrorKind::UnknownError,
        }
    }

    /// Upstream HTTP status, when the failure came from a non-2xx answer
    pub fn upstream_status(&self) -> Option<StatusCode> {
        match self {
            AppError::Api { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            AppError::Config(e.to_string())
        } else if e.is_status() || e.is_decode() {
            AppError::Api {
                status: e.status(),
                message: e.to_string(),
                source: Some(Box::new(e)),
            }
        } else if e.is_timeout() || e.is_connect() || e.is_request() || e.is_body() {
            AppError::Network(e)
        } else {
            AppError::Unknown {
                message: e.to_string(),
                source: Some(Box::new(e)),
            }
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Api {
            status: None,
            message: format!("Malformed response body: {}", e),
            source: Some(Box::new(e)),
        }
    }
}

/// Malformed or unparsable request bodies are the caller's fault
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Api { .. } => StatusCode::BAD_GATEWAY,
            AppError::Network(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            AppError::Network(_) => StatusCode::BAD_GATEWAY,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Cancelled(_) => StatusCode::CONFLICT,
            AppError::Unknown { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
