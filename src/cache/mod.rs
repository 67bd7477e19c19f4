//! Response cache collaborator
//!
//! The pipeline only needs two primitives, [`ResponseCache::lookup`] and
//! [`ResponseCache::store`], keyed by [`CacheKey`]. Eviction is left to the
//! backend.

mod store;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use url::Url;

use crate::edge::EdgeResponse;

pub use store::ObjectStoreCache;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(#[from] object_store::Error),

    #[error("corrupt cache entry for {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// Cache key derived from the request URL alone.
///
/// The method is fixed to `GET` and headers never participate, so two
/// requests for the same URL share an entry whatever their Referer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn from_url(url: &Url) -> Self {
        let mut url = url.clone();
        url.set_fragment(None);
        Self(format!("GET {url}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn lookup(&self, key: &CacheKey) -> Result<Option<EdgeResponse>>;

    async fn store(&self, key: &CacheKey, response: &EdgeResponse) -> Result<()>;
}

/// Cache that never hits and discards every store.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl ResponseCache for NoopCache {
    async fn lookup(&self, _key: &CacheKey) -> Result<Option<EdgeResponse>> {
        Ok(None)
    }

    async fn store(&self, _key: &CacheKey, _response: &EdgeResponse) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn key(url: &str) -> CacheKey {
        CacheKey::from_url(&Url::parse(url).unwrap())
    }

    #[test]
    fn test_key_uses_get_and_full_url() {
        assert_eq!(
            key("https://x001.vicdn.cc/abc.m3u8?v=2").as_str(),
            "GET https://x001.vicdn.cc/abc.m3u8?v=2"
        );
    }

    #[test]
    fn test_key_normalizes_host_and_default_port() {
        assert_eq!(
            key("https://X001.VICDN.CC:443/abc.m3u8"),
            key("https://x001.vicdn.cc/abc.m3u8")
        );
    }

    #[test]
    fn test_key_ignores_fragment() {
        assert_eq!(
            key("https://x001.vicdn.cc/abc.jpg#top"),
            key("https://x001.vicdn.cc/abc.jpg")
        );
    }

    #[test]
    fn test_query_distinguishes_keys() {
        assert_ne!(
            key("https://x001.vicdn.cc/abc.jpg?a=1"),
            key("https://x001.vicdn.cc/abc.jpg?a=2")
        );
    }

    #[tokio::test]
    async fn test_noop_cache_never_hits() {
        let cache = NoopCache;
        let k = key("https://x001.vicdn.cc/abc.jpg");
        let response = EdgeResponse::plain(StatusCode::OK, "ok");
        cache.store(&k, &response).await.unwrap();
        assert!(cache.lookup(&k).await.unwrap().is_none());
    }
}
