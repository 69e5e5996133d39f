use serde::Deserialize;
use std::{fmt, time::Duration};

use crate::error::{AppError, AppResult};

/// API key for the recommendation service. Never printed.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Recommendation API base URL
    #[serde(default)]
    pub recommendation_api_url: Option<String>,

    /// Recommendation API key, sent as `X-API-Key`
    #[serde(default)]
    pub recommendation_api_key: Option<ApiKey>,

    /// Per-call timeout for the recommendation API
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Validates the recommendation API settings before anything touches the network
    pub fn client_config(&self) -> AppResult<ClientConfig> {
        let base_url = self
            .recommendation_api_url
            .clone()
            .ok_or_else(|| AppError::Config("RECOMMENDATION_API_URL is not set".to_string()))?;
        let api_key = self
            .recommendation_api_key
            .clone()
            .ok_or_else(|| AppError::Config("RECOMMENDATION_API_KEY is not set".to_string()))?;

        ClientConfig::new(
            base_url,
            api_key,
            Duration::from_secs(self.request_timeout_secs),
        )
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Validated settings for talking to the recommendation API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    api_key: ApiKey,
    timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: ApiKey, timeout: Duration) -> AppResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();

        if base_url.is_empty() {
            return Err(AppError::Config(
                "Recommendation API base URL is empty".to_string(),
            ));
        }
        if let Err(e) = reqwest::Url::parse(&base_url) {
            return Err(AppError::Config(format!(
                "Recommendation API base URL '{}' is invalid: {}",
                base_url, e
            )));
        }
        if api_key.expose().trim().is_empty() {
            return Err(AppError::Config(
                "Recommendation API key is empty".to_string(),
            ));
        }
        // Sent verbatim as X-API-Key, so it must be a legal header value
        if reqwest::header::HeaderValue::from_str(api_key.expose()).is_err() {
            return Err(AppError::Config(
                "Recommendation API key contains characters not allowed in an HTTP header"
                    .to_string(),
            ));
        }
        if timeout.is_zero() {
            return Err(AppError::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            api_key,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
