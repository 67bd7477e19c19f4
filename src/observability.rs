//! Logging setup and pipeline counters

use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, TelemetryConfig};

/// Install the global tracing subscriber. `RUST_LOG` takes precedence over
/// the configured filter.
pub fn init_tracing(config: &TelemetryConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match config.log_format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {e}");
    }
}

/// Counters for pipeline outcomes
#[derive(Debug, Default)]
pub struct Metrics {
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    rejections: AtomicU64,
    redirects: AtomicU64,
    origin_fetches: AtomicU64,
    origin_failures: AtomicU64,
    cache_stores: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "cache_hits", "Metric incremented");
    }

    pub fn cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "cache_misses", "Metric incremented");
    }

    pub fn rejected(&self) {
        self.rejections.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "rejections", "Metric incremented");
    }

    pub fn redirected(&self) {
        self.redirects.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "redirects", "Metric incremented");
    }

    pub fn origin_fetched(&self) {
        self.origin_fetches.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "origin_fetches", "Metric incremented");
    }

    pub fn origin_failed(&self) {
        self.origin_failures.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "origin_failures", "Metric incremented");
    }

    pub fn cache_stored(&self) {
        self.cache_stores.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "cache_stores", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            rejections: self.rejections.load(Ordering::Relaxed),
            redirects: self.redirects.load(Ordering::Relaxed),
            origin_fetches: self.origin_fetches.load(Ordering::Relaxed),
            origin_failures: self.origin_failures.load(Ordering::Relaxed),
            cache_stores: self.cache_stores.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub rejections: u64,
    pub redirects: u64,
    pub origin_fetches: u64,
    pub origin_failures: u64,
    pub cache_stores: u64,
}
