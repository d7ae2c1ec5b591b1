//! Provider construction from configuration.
//!
//! The provider stack is assembled once per run: the configured service,
//! wrapped in retries, optionally wrapped in a cache.

use std::sync::Arc;
use std::time::Duration;

use embedsim_embeddings::{
    BedrockTitanProvider, CachedProvider, EmbeddingCache, EmbeddingProvider, OpenAIProvider,
    RetryingProvider,
};
use tracing::{debug, info};

use crate::config::{EmbedsimConfig, ProviderKind};
use crate::error::Result;

/// Build the provider described by `config`.
pub async fn build_provider(config: &EmbedsimConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;

    let settings = &config.provider;
    let base: Box<dyn EmbeddingProvider> = match settings.kind {
        ProviderKind::Bedrock => {
            let mut provider = BedrockTitanProvider::new().with_client(client);
            if let Some(model) = &settings.model {
                provider = provider.with_model(model);
            }
            if let Some(region) = &settings.region {
                provider = provider.with_region(region);
            }
            if let Some(endpoint) = &settings.endpoint {
                provider = provider.with_endpoint(endpoint);
            }
            if let Some(dims) = settings.dimensions {
                provider = provider.with_dimensions(dims);
            }
            if let Some(normalize) = settings.normalize {
                provider = provider.with_normalize(normalize);
            }
            Box::new(provider)
        }
        ProviderKind::OpenAI => {
            let mut provider = OpenAIProvider::new().with_client(client);
            if let Some(model) = &settings.model {
                provider = provider.with_model(model);
            }
            if let Some(endpoint) = &settings.endpoint {
                provider = provider.with_base_url(endpoint);
            }
            Box::new(provider)
        }
    };

    info!(
        "Using {} provider with model {}",
        base.name(),
        base.default_model()
    );

    let retrying: Box<dyn EmbeddingProvider> = Box::new(RetryingProvider::new(base, config.retry));

    if !config.cache.enabled {
        return Ok(Arc::from(retrying));
    }

    let cache = match &config.cache.path {
        Some(path) => EmbeddingCache::with_persistence(path, config.cache.max_entries).await?,
        None => EmbeddingCache::new(config.cache.max_entries),
    };
    debug!("Embedding cache enabled ({} entries max)", config.cache.max_entries);

    Ok(Arc::new(CachedProvider::new(retrying, cache)))
}
