use axum::http::StatusCode;
use bon::Builder;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::classify::NormalizedPath;
use super::error::EdgeError;
use super::origin::OriginDescriptor;
use super::referer::check_referer;
use super::request::IncomingRequest;
use super::response::{EdgeResponse, decorate};
use super::rules::EdgeRules;
use super::shard::ShardId;
use super::video_id::extract_video_id;
use crate::cache::{CacheKey, ResponseCache};
use crate::observability::Metrics;
use crate::origin::OriginFetcher;

/// Where a validated request should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `index.html`: 302 to the site root
    Redirect(String),
    Origin(OriginDescriptor),
}

/// Per-request edge pipeline. Holds no mutable state besides counters, so a
/// single instance is shared by every connection.
#[derive(Builder, Clone)]
pub struct Pipeline {
    #[builder(default)]
    rules: Arc<EdgeRules>,
    cache: Arc<dyn ResponseCache>,
    fetcher: Arc<dyn OriginFetcher>,
    #[builder(default)]
    metrics: Arc<Metrics>,
    /// Larger 200 responses are served but not stored
    #[builder(default = u64::MAX)]
    max_cacheable_bytes: u64,
}

impl Pipeline {
    pub fn rules(&self) -> &EdgeRules {
        &self.rules
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Run the full pipeline. Never fails: every error becomes a response.
    pub async fn handle(&self, request: &IncomingRequest) -> EdgeResponse {
        let key = CacheKey::from_url(&request.url);

        if let Some(cached) = self.lookup(&key).await {
            return cached;
        }

        let origin = match self.route(request) {
            Ok(Route::Origin(origin)) => origin,
            Ok(Route::Redirect(location)) => {
                self.metrics.redirected();
                debug!(host = request.hostname(), %location, "Redirecting index request");
                return EdgeResponse::redirect(&location);
            }
            Err(e) => {
                self.metrics.rejected();
                debug!(
                    host = request.hostname(),
                    path = request.url.path(),
                    error = %e,
                    "Request rejected"
                );
                return e.to_response();
            }
        };

        match self.fetch(&origin).await {
            Ok(response) => {
                self.populate(&key, &response).await;
                response
            }
            Err(e) => e.to_response(),
        }
    }

    /// Validation and resolution without touching the cache or the network.
    ///
    /// Order: empty path, Referer guard, shard resolution, index redirect,
    /// Video ID extraction, origin URL.
    pub fn route(&self, request: &IncomingRequest) -> Result<Route, EdgeError> {
        let path = NormalizedPath::new(request.url.path());
        if path.is_empty() {
            return Err(EdgeError::NotFound);
        }

        let classification = path.classification();
        check_referer(classification, request.referer(), &self.rules)?;

        let host = request.hostname();
        let shard = ShardId::from_host(host, &self.rules)
            .ok_or_else(|| EdgeError::ForbiddenHost(host.to_string()))?;

        if path.is_index() {
            return Ok(Route::Redirect(self.rules.site_root().to_string()));
        }

        let video_id = extract_video_id(&path, classification)?;

        Ok(Route::Origin(OriginDescriptor::build(
            &video_id,
            &shard,
            &path,
            &self.rules,
        )))
    }

    async fn lookup(&self, key: &CacheKey) -> Option<EdgeResponse> {
        match self.cache.lookup(key).await {
            Ok(Some(response)) => {
                self.metrics.cache_hit();
                Some(response)
            }
            Ok(None) => {
                self.metrics.cache_miss();
                None
            }
            Err(e) => {
                self.metrics.cache_miss();
                warn!(%key, error = %e, "Cache lookup failed, treating as miss");
                None
            }
        }
    }

    async fn fetch(&self, origin: &OriginDescriptor) -> Result<EdgeResponse, EdgeError> {
        self.metrics.origin_fetched();

        let response = self.fetcher.fetch(origin).await.map_err(|e| {
            self.metrics.origin_failed();
            warn!(origin = %origin, error = %e, "Origin unreachable");
            EdgeError::UpstreamUnreachable(e.to_string())
        })?;

        if !response.status.is_success() {
            self.metrics.origin_failed();
            info!(
                origin = %origin,
                status = response.status.as_u16(),
                "Origin returned non-success status"
            );
            return Err(EdgeError::UpstreamRejected(response.status.as_u16()));
        }

        debug!(
            origin = %origin,
            shard = %origin.shard,
            video_id = %origin.video_id,
            status = response.status.as_u16(),
            "Origin fetch succeeded"
        );

        Ok(decorate(response.status, &response.headers, response.body))
    }

    async fn populate(&self, key: &CacheKey, response: &EdgeResponse) {
        if response.status != StatusCode::OK {
            return;
        }

        if response.body.len() as u64 > self.max_cacheable_bytes {
            debug!(%key, size = response.body.len(), "Response too large to cache");
            return;
        }

        match self.cache.store(key, response).await {
            Ok(()) => self.metrics.cache_stored(),
            Err(e) => warn!(%key, error = %e, "Cache store failed"),
        }
    }
}
