//! HTTP client for catalog page fetching
//!
//! The shop only returns the product grid markup to requests that look like
//! the browser's own "load more" AJAX calls, so every request carries the
//! fixed header set from [`HttpClientConfig::default`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, StatusCode};
use thiserror::Error;

/// Header identifying the request as XMLHttpRequest
pub const X_REQUESTED_WITH: &str = "x-requested-with";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP status {code} for {url}")]
    Status { code: u16, url: String },

    #[error("HTTP client setup failed: {0}")]
    Setup(String),
}

impl FetchError {
    fn transport(url: &str, err: &reqwest::Error) -> Self {
        Self::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    /// Status code for `Status` errors
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Source of raw page bodies
///
/// Implemented by [`HttpClient`] for real crawls; tests substitute in-memory
/// fetchers.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP client configuration for crawling
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    /// `None` keeps reqwest's default (no overall request timeout)
    pub timeout_seconds: Option<u64>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            accept: "*/*".to_string(),
            accept_language: "en,uk;q=0.9".to_string(),
            timeout_seconds: None,
        }
    }
}

impl HttpClientConfig {
    pub fn with_timeout(mut self, timeout_seconds: Option<u64>) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }
}

/// reqwest-backed page fetcher; no retries, no rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, header_value(&config.accept)?);
        headers.insert(ACCEPT_LANGUAGE, header_value(&config.accept_language)?);
        headers.insert(
            HeaderName::from_static(X_REQUESTED_WITH),
            HeaderValue::from_static("XMLHttpRequest"),
        );
        headers.insert(USER_AGENT, header_value(&config.user_agent)?);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Setup(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Fetch URL and return text content; anything but 200 is an error
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, &e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                code: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::transport(url, &e))?;

        tracing::debug!("Successfully fetched: {} ({} chars)", url, text.len());
        Ok(text)
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.get_text(url).await
    }
}

fn header_value(value: &str) -> Result<HeaderValue, FetchError> {
    HeaderValue::from_str(value).map_err(|e| FetchError::Setup(format!("invalid header value '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_creation() {
        let client = HttpClient::new(HttpClientConfig::default()).unwrap();
        assert_eq!(client.config().timeout_seconds, None);
    }

    #[test]
    fn test_invalid_header_is_setup_error() {
        let config = HttpClientConfig {
            user_agent: "bad\nagent".to_string(),
            ..Default::default()
        };
        assert!(matches!(HttpClient::new(config), Err(FetchError::Setup(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = HttpClient::new(HttpClientConfig::default().with_timeout(Some(2))).unwrap();

        let err = client.fetch("http://127.0.0.1:9/catalog").await.unwrap_err();

        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(err.status_code(), None);
    }
}
