//! Response cache on top of the `object_store` crate

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use object_store::{ObjectStore, path::Path as StoragePath};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use super::{CacheError, CacheKey, ResponseCache, Result};
use crate::edge::EdgeResponse;

const PREFIX: &str = "responses";

/// Status and headers of a cached response. The body lives in a sibling object.
#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    key: String,
    status: u16,
    /// Header name and base64 of the raw value bytes
    headers: Vec<(String, String)>,
    body_len: usize,
    #[serde(with = "chrono::serde::ts_seconds")]
    stored_at: DateTime<Utc>,
}

/// Cache client wrapping any `object_store` backend.
///
/// Each entry is two objects named after a UUIDv5 of the key: the body is
/// written first, then the metadata, so a reader never sees metadata
/// without its body.
#[derive(Clone)]
pub struct ObjectStoreCache {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreCache {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Process-local cache, lost on restart
    pub fn in_memory() -> Self {
        Self::new(Arc::new(object_store::memory::InMemory::new()))
    }

    /// Cache persisted under `root`, created if missing
    pub fn local(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root)?;
        let store = object_store::local::LocalFileSystem::new_with_prefix(root)?;
        Ok(Self::new(Arc::new(store)))
    }

    fn paths(key: &CacheKey) -> (StoragePath, StoragePath) {
        let id = Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_str().as_bytes());
        (
            StoragePath::from(format!("{PREFIX}/{id}.json")),
            StoragePath::from(format!("{PREFIX}/{id}.body")),
        )
    }

    async fn get_optional(&self, path: &StoragePath) -> Result<Option<Bytes>> {
        match self.store.get(path).await {
            Ok(result) => Ok(Some(result.bytes().await?)),
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ResponseCache for ObjectStoreCache {
    async fn lookup(&self, key: &CacheKey) -> Result<Option<EdgeResponse>> {
        let (meta_path, body_path) = Self::paths(key);

        let Some(raw_meta) = self.get_optional(&meta_path).await? else {
            return Ok(None);
        };
        let meta: EntryMeta = serde_json::from_slice(&raw_meta).map_err(|e| corrupt(key, e))?;

        // UUIDv5 collisions are not expected, but never serve another URL's bytes
        if meta.key != key.as_str() {
            return Ok(None);
        }

        let Some(body) = self.get_optional(&body_path).await? else {
            return Ok(None);
        };
        if body.len() != meta.body_len {
            return Err(corrupt(
                key,
                format!("body is {} bytes, expected {}", body.len(), meta.body_len),
            ));
        }

        let status = StatusCode::from_u16(meta.status).map_err(|e| corrupt(key, e))?;
        let mut headers = HeaderMap::with_capacity(meta.headers.len());
        for (name, value) in &meta.headers {
            let name = HeaderName::try_from(name.as_str()).map_err(|e| corrupt(key, e))?;
            let raw = STANDARD.decode(value).map_err(|e| corrupt(key, e))?;
            let value = HeaderValue::from_bytes(&raw).map_err(|e| corrupt(key, e))?;
            headers.append(name, value);
        }

        tracing::debug!(%key, size = body.len(), "Cache hit");
        Ok(Some(EdgeResponse::new(status, headers, body)))
    }

    async fn store(&self, key: &CacheKey, response: &EdgeResponse) -> Result<()> {
        let (meta_path, body_path) = Self::paths(key);

        let headers = response
            .headers
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), STANDARD.encode(value.as_bytes())))
            .collect();

        let meta = EntryMeta {
            key: key.as_str().to_string(),
            status: response.status.as_u16(),
            headers,
            body_len: response.body.len(),
            stored_at: Utc::now(),
        };
        let raw_meta = serde_json::to_vec(&meta).map_err(|e| corrupt(key, e))?;

        self.store
            .put(&body_path, response.body.clone().into())
            .await?;
        self.store.put(&meta_path, raw_meta.into()).await?;

        tracing::info!(%key, size = response.body.len(), "Stored response in cache");
        Ok(())
    }
}

fn corrupt(key: &CacheKey, reason: impl std::fmt::Display) -> CacheError {
    CacheError::Corrupt {
        key: key.as_str().to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;
    use tempfile::TempDir;
    use url::Url;

    fn key(url: &str) -> CacheKey {
        CacheKey::from_url(&Url::parse(url).unwrap())
    }

    fn sample_response() -> EdgeResponse {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=31536000, immutable"),
        );
        EdgeResponse::new(StatusCode::OK, headers, Bytes::from_static(b"\x89PNG data"))
    }

    #[tokio::test]
    async fn test_miss_on_empty_cache() {
        let cache = ObjectStoreCache::in_memory();
        let result = cache.lookup(&key("https://x001.vicdn.cc/a.jpg")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_store_then_lookup_returns_same_response() {
        let cache = ObjectStoreCache::in_memory();
        let k = key("https://x001.vicdn.cc/tv-1-2-3-index.png");
        let response = sample_response();

        cache.store(&k, &response).await.unwrap();
        let cached = cache.lookup(&k).await.unwrap().unwrap();

        assert_eq!(cached, response);
    }

    #[tokio::test]
    async fn test_entries_are_isolated_per_key() {
        let cache = ObjectStoreCache::in_memory();
        cache
            .store(&key("https://x001.vicdn.cc/a.jpg"), &sample_response())
            .await
            .unwrap();

        let other = cache.lookup(&key("https://x002.vicdn.cc/a.jpg")).await.unwrap();
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn test_opaque_header_values_survive_verbatim() {
        let cache = ObjectStoreCache::in_memory();
        let k = key("https://x001.vicdn.cc/b.jpg");
        let mut response = sample_response();
        response.headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_bytes(b"inline; filename=\"caf\xe9.jpg\"").unwrap(),
        );
        response
            .headers
            .append("x-origin-tag", HeaderValue::from_static("a"));
        response
            .headers
            .append("x-origin-tag", HeaderValue::from_static("b"));

        cache.store(&k, &response).await.unwrap();
        let cached = cache.lookup(&k).await.unwrap().unwrap();

        assert_eq!(cached.headers, response.headers);
        assert_eq!(
            cached.headers[header::CONTENT_DISPOSITION].as_bytes(),
            b"inline; filename=\"caf\xe9.jpg\""
        );
    }

    #[tokio::test]
    async fn test_local_cache_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let k = key("https://x001.vicdn.cc/a.vtt");

        ObjectStoreCache::local(temp_dir.path())
            .unwrap()
            .store(&k, &sample_response())
            .await
            .unwrap();

        let reopened = ObjectStoreCache::local(temp_dir.path()).unwrap();
        let cached = reopened.lookup(&k).await.unwrap().unwrap();
        assert_eq!(cached.body, sample_response().body);
    }

    #[tokio::test]
    async fn test_truncated_body_is_reported_corrupt() {
        let cache = ObjectStoreCache::in_memory();
        let k = key("https://x001.vicdn.cc/a.jpg");
        cache.store(&k, &sample_response()).await.unwrap();

        let (_, body_path) = ObjectStoreCache::paths(&k);
        cache
            .store
            .put(&body_path, Bytes::from_static(b"short").into())
            .await
            .unwrap();

        let err = cache.lookup(&k).await.unwrap_err();
        assert!(matches!(err, CacheError::Corrupt { .. }));
    }
}
