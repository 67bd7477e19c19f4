//! reqwest-backed origin fetcher

use async_trait::async_trait;
use bytes::BytesMut;
use reqwest::{Client, redirect::Policy};
use std::time::Duration;
use tracing::debug;

use super::{FetchError, OriginFetcher, OriginResponse, Result};
use crate::config::OriginConfig;
use crate::edge::OriginDescriptor;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
    /// Bodies larger than this are abandoned mid-read
    pub max_body_bytes: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            max_redirects: 10,
            user_agent: concat!("shardgate/", env!("CARGO_PKG_VERSION")).to_string(),
            max_body_bytes: 512 * 1024 * 1024,
        }
    }
}

impl From<&OriginConfig> for HttpConfig {
    fn from(config: &OriginConfig) -> Self {
        Self {
            connect_timeout: Duration::from_millis(config.connect_timeout_ms),
            request_timeout: Duration::from_millis(config.request_timeout_ms),
            max_redirects: config.max_redirects,
            user_agent: config.user_agent.clone(),
            max_body_bytes: config.max_body_bytes.as_u64(),
        }
    }
}

/// Origin fetcher over a shared connection pool
#[derive(Debug, Clone)]
pub struct HttpOriginFetcher {
    client: Client,
    max_body_bytes: u64,
}

impl HttpOriginFetcher {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let redirect = if config.max_redirects == 0 {
            Policy::none()
        } else {
            Policy::limited(config.max_redirects)
        };

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .redirect(redirect)
            .build()
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Single `GET` against an arbitrary URL
    pub async fn get(&self, url: &str) -> Result<OriginResponse> {
        let url = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        debug!(%url, "Fetching from origin");

        let mut response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else if e.is_redirect() {
                FetchError::TooManyRedirects
            } else {
                FetchError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();

        let limit = self.max_body_bytes;
        if response.content_length().is_some_and(|len| len > limit) {
            return Err(FetchError::BodyTooLarge { limit });
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::RequestFailed(format!("Failed to read body: {}", e))
            }
        })? {
            if (body.len() + chunk.len()) as u64 > limit {
                return Err(FetchError::BodyTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }
        let body = body.freeze();

        debug!(%url, status = status.as_u16(), size = body.len(), "Origin responded");

        Ok(OriginResponse { status, headers, body })
    }
}

#[async_trait]
impl OriginFetcher for HttpOriginFetcher {
    async fn fetch(&self, origin: &OriginDescriptor) -> Result<OriginResponse> {
        self.get(&origin.url).await
    }
}
