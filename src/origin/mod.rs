//! Outbound access to origin shards

mod http;

use async_trait::async_trait;
use axum::http::{HeaderMap, StatusCode};
use bytes::Bytes;
use thiserror::Error;

use crate::edge::OriginDescriptor;

pub use http::{HttpConfig, HttpOriginFetcher};

/// Transport-level failures. An origin that answers, whatever the status,
/// is not an error here.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Connection timeout")]
    Timeout,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Too many redirects")]
    TooManyRedirects,

    #[error("Response body exceeds {limit} bytes")]
    BodyTooLarge { limit: u64 },
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// Buffered origin response
#[derive(Debug, Clone)]
pub struct OriginResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Performs exactly one request per call; retries are the implementor's business.
#[async_trait]
pub trait OriginFetcher: Send + Sync {
    async fn fetch(&self, origin: &OriginDescriptor) -> Result<OriginResponse>;
}
