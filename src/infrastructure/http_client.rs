//! HTTP transport for catalog and asset fetches.
//!
//! The rest of the crate never talks to the network directly: everything
//! goes through the [`Transport`] trait so tests can script responses.
//! The default implementation wraps `reqwest` with rate limiting and
//! cancellation support.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::config::defaults;

/// Errors surfaced by the transport layer.
///
/// Listing/detail callers report these upward as a single failed-fetch
/// signal; the asset cache retries them internally.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} was cancelled")]
    Cancelled { url: String },

    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

/// Raw byte transport. `fetch` suspends only at the network boundary and
/// honors the cancellation token at every await point.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str, token: CancellationToken) -> Result<Bytes, FetchError>;
}

/// HTTP client configuration
#[derive(Debug, Clone, serde::Serialize)]
pub struct HttpClientConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_requests_per_second: u32,
    pub follow_redirects: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: "aniscope/0.2".to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECS,
            max_requests_per_second: defaults::MAX_REQUESTS_PER_SECOND,
            follow_redirects: true,
        }
    }
}

/// Rate-limited HTTP client implementing [`Transport`].
pub struct HttpClient {
    client: Client,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .context("Failed to create HTTP client")?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.max_requests_per_second)
                .context("Rate limit must be greater than 0")?,
        );
        let rate_limiter = RateLimiter::direct(quota);

        Ok(Self {
            client,
            rate_limiter,
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn fetch(&self, url: &str, token: CancellationToken) -> Result<Bytes, FetchError> {
        if token.is_cancelled() {
            return Err(FetchError::Cancelled {
                url: url.to_string(),
            });
        }

        // Wait for the rate limiter, bailing out if cancelled meanwhile
        tokio::select! {
            _ = self.rate_limiter.until_ready() => {}
            _ = token.cancelled() => {
                return Err(FetchError::Cancelled { url: url.to_string() });
            }
        }

        debug!("Fetching URL: {}", url);

        let response = tokio::select! {
            result = self.client.get(url).send() => {
                result.map_err(|source| FetchError::Request {
                    url: url.to_string(),
                    source,
                })?
            }
            _ = token.cancelled() => {
                warn!("HTTP request cancelled for URL: {}", url);
                return Err(FetchError::Cancelled { url: url.to_string() });
            }
        };

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = tokio::select! {
            result = response.bytes() => {
                result.map_err(|source| FetchError::Request {
                    url: url.to_string(),
                    source,
                })?
            }
            _ = token.cancelled() => {
                warn!("Response reading cancelled for URL: {}", url);
                return Err(FetchError::Cancelled { url: url.to_string() });
            }
        };

        debug!("Successfully fetched: {} ({} bytes)", url, body.len());
        Ok(body)
    }
}
