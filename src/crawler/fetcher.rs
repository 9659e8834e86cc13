//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the archiver, including:
//! - Building HTTP clients with the configured user agent, cookie and timeout
//! - GET requests for pages and binary assets (avatars)
//! - Classifying responses into "never existed", "unavailable" and transport failures

use crate::config::HttpConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Body the forum answers with for IDs that were never allocated
pub const NOT_FOUND_MARKER: &str = "key_not_found";

/// Failure modes of a fetch
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source reports the ID was never allocated
    #[error("page was never allocated")]
    NotFound,

    /// The ID exists but its content is removed or restricted
    #[error("page unavailable (HTTP {status})")]
    Unavailable { status: u16 },

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),
}

impl FetchError {
    fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_connect() {
            FetchError::Transport(format!("connection failed: {}", error))
        } else {
            FetchError::Transport(error.to_string())
        }
    }
}

/// A downloaded binary resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// Fetch capability consumed by pipelines and extractors
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the HTML of a page
    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError>;

    /// Fetches a binary resource referenced by a page
    async fn fetch_asset(&self, url: &Url) -> Result<Asset, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    if let Some(cookie) = &config.cookie {
        match HeaderValue::from_str(cookie) {
            Ok(value) => {
                headers.insert(COOKIE, value);
            }
            Err(_) => tracing::warn!("Ignoring cookie with characters not allowed in a header"),
        }
    }

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from the HTTP configuration
    pub fn from_config(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    /// Fetches a page and classifies the response
    ///
    /// | Response | Result |
    /// |----------|--------|
    /// | body is `key_not_found` | `NotFound` (any status) |
    /// | non-2xx status | `Unavailable` |
    /// | timeout | `Timeout` |
    /// | other transport failure | `Transport` |
    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        let body = response.text().await.map_err(FetchError::from_reqwest)?;

        // The marker wins over the status code, the forum sends it with 404 and 200 alike
        if body.trim() == NOT_FOUND_MARKER {
            return Err(FetchError::NotFound);
        }

        if !status.is_success() {
            return Err(FetchError::Unavailable {
                status: status.as_u16(),
            });
        }

        Ok(body)
    }

    async fn fetch_asset(&self, url: &Url) -> Result<Asset, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Unavailable {
                status: status.as_u16(),
            });
        }

        let mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(FetchError::from_reqwest)?
            .to_vec();

        Ok(Asset { bytes, mime })
    }
}
