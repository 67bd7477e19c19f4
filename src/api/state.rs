use std::sync::Arc;

use crate::cache::{NoopCache, ObjectStoreCache, ResponseCache};
use crate::config::{CacheProvider, Config};
use crate::edge::{EdgeRules, Pipeline};
use crate::origin::{HttpConfig, HttpOriginFetcher, OriginFetcher};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Pipeline,
}

impl AppState {
    pub fn new(config: Config, pipeline: Pipeline) -> Self {
        Self {
            config: Arc::new(config),
            pipeline,
        }
    }

    /// Wire the production collaborators described by `config`.
    pub fn from_config(config: Config) -> Result<Self, AnyError> {
        let cache = build_cache(&config)?;
        let fetcher: Arc<dyn OriginFetcher> =
            Arc::new(HttpOriginFetcher::new(HttpConfig::from(&config.origin))?);
        let pipeline = build_pipeline(&config, cache, fetcher)?;
        Ok(Self::new(config, pipeline))
    }
}

/// Pipeline over the given collaborators, with rules and limits from `config`.
pub fn build_pipeline(
    config: &Config,
    cache: Arc<dyn ResponseCache>,
    fetcher: Arc<dyn OriginFetcher>,
) -> Result<Pipeline, AnyError> {
    let rules = EdgeRules::from_config(&config.edge)?;

    Ok(Pipeline::builder()
        .rules(Arc::new(rules))
        .cache(cache)
        .fetcher(fetcher)
        .max_cacheable_bytes(config.cache.max_body_bytes.as_u64())
        .build())
}

fn build_cache(config: &Config) -> Result<Arc<dyn ResponseCache>, AnyError> {
    let cache: Arc<dyn ResponseCache> = match config.cache.provider {
        CacheProvider::Memory => {
            tracing::info!("Using in-memory response cache");
            Arc::new(ObjectStoreCache::in_memory())
        }
        CacheProvider::Local => {
            let path = config
                .cache
                .path
                .as_deref()
                .ok_or("cache.path is required for the local provider")?;
            tracing::info!(path = %path.display(), "Using local response cache");
            Arc::new(ObjectStoreCache::local(path)?)
        }
        CacheProvider::Disabled => {
            tracing::warn!("Response cache disabled");
            Arc::new(NoopCache)
        }
    };
    Ok(cache)
}
