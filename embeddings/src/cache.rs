//! Embedding cache so repeated texts are embedded once.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};

/// Cache entry for an embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// SHA-256 of model, settings and text.
    pub key: String,

    /// The embedded text, compared on every hit.
    #[serde(default)]
    pub text: String,

    /// The embedding vector.
    pub embedding: Embedding,

    /// Model used to generate the embedding.
    pub model: String,

    /// Provider settings the embedding was generated under.
    #[serde(default)]
    pub settings: String,

    /// Insertion order, used for eviction.
    pub sequence: u64,
}

impl CacheEntry {
    fn matches(&self, text: &str, model: &str, settings: &str) -> bool {
        self.text == text && self.model == model && self.settings == settings
    }
}

/// Cache for embeddings to avoid redundant API calls.
///
/// Entries are keyed by text, model and provider settings.
pub struct EmbeddingCache {
    /// In-memory cache.
    cache: Arc<RwLock<HashMap<String, CacheEntry>>>,

    /// Path for persistent cache storage.
    cache_path: Option<PathBuf>,

    /// Maximum cache size.
    max_entries: usize,

    /// Next insertion sequence number.
    next_sequence: AtomicU64,
}

impl EmbeddingCache {
    /// Create a new in-memory cache.
    pub fn new(max_entries: usize) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            cache_path: None,
            max_entries,
            next_sequence: AtomicU64::new(0),
        }
    }

    /// Create a cache with persistent storage, loading any existing file.
    pub async fn with_persistence(path: impl AsRef<Path>, max_entries: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let cache = Self {
            cache_path: Some(path.clone()),
            ..Self::new(max_entries)
        };

        if fs::try_exists(&path).await? {
            cache.load(&path).await?;
        }

        Ok(cache)
    }

    /// Compute a key for cache lookup. Stable across builds and platforms.
    fn hash_key(text: &str, model: &str, settings: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(model.as_bytes());
        hasher.update(b"\0");
        hasher.update(settings.as_bytes());
        hasher.update(b"\0");
        hasher.update(text.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Get an embedding from the cache.
    pub async fn get(&self, text: &str, model: &str, settings: &str) -> Option<Embedding> {
        let key = Self::hash_key(text, model, settings);
        let cache = self.cache.read().await;
        cache
            .get(&key)
            .filter(|e| e.matches(text, model, settings))
            .map(|e| e.embedding.clone())
    }

    /// Put an embedding in the cache.
    pub async fn put(
        &self,
        text: &str,
        model: &str,
        settings: &str,
        embedding: Embedding,
    ) -> Result<()> {
        if self.max_entries == 0 {
            return Ok(());
        }

        let key = Self::hash_key(text, model, settings);
        let entry = CacheEntry {
            key: key.clone(),
            text: text.to_string(),
            embedding,
            model: model.to_string(),
            settings: settings.to_string(),
            sequence: self.next_sequence.fetch_add(1, Ordering::Relaxed),
        };

        let mut cache = self.cache.write().await;

        if !cache.contains_key(&key) && cache.len() >= self.max_entries {
            if let Some(oldest_key) = cache
                .values()
                .min_by_key(|e| e.sequence)
                .map(|e| e.key.clone())
            {
                cache.remove(&oldest_key);
            }
        }

        cache.insert(key, entry);
        debug!("Cached embedding for text (model: {model})");

        if self.cache_path.is_some() {
            drop(cache); // Release lock before I/O
            self.save().await?;
        }

        Ok(())
    }

    /// Check if an embedding is cached.
    pub async fn contains(&self, text: &str, model: &str, settings: &str) -> bool {
        self.get(text, model, settings).await.is_some()
    }

    /// Get cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let cache = self.cache.read().await;
        let mut models: Vec<String> = cache
            .values()
            .map(|e| e.model.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        models.sort();

        CacheStats {
            entries: cache.len(),
            max_entries: self.max_entries,
            models,
        }
    }

    /// Save cache to disk.
    async fn save(&self) -> Result<()> {
        if let Some(ref path) = self.cache_path {
            let cache = self.cache.read().await;
            let mut entries: Vec<&CacheEntry> = cache.values().collect();
            entries.sort_by_key(|e| e.sequence);
            let content = serde_json::to_string(&entries)?;

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }

            fs::write(path, content).await?;
            debug!("Saved {} cache entries to disk", entries.len());
        }
        Ok(())
    }

    /// Load cache from disk, dropping entries whose key does not match
    /// their contents (older key formats).
    async fn load(&self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path).await?;
        let entries: Vec<CacheEntry> = serde_json::from_str(&content)?;

        let mut cache = self.cache.write().await;
        let mut next = 0;
        let mut stale = 0;
        for entry in entries {
            next = next.max(entry.sequence + 1);
            if Self::hash_key(&entry.text, &entry.model, &entry.settings) != entry.key {
                stale += 1;
                continue;
            }
            cache.insert(entry.key.clone(), entry);
        }
        self.next_sequence.store(next, Ordering::Relaxed);

        if stale > 0 {
            warn!("Dropped {stale} stale cache entries from {}", path.display());
        }
        info!("Loaded {} cache entries from disk", cache.len());
        Ok(())
    }
}

/// Statistics about the embedding cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of entries in cache.
    pub entries: usize,

    /// Maximum cache size.
    pub max_entries: usize,

    /// Models with cached embeddings.
    pub models: Vec<String>,
}

/// A provider wrapper that serves repeated texts from an [`EmbeddingCache`].
pub struct CachedProvider<P> {
    provider: P,
    cache: EmbeddingCache,
}

impl<P> CachedProvider<P>
where
    P: EmbeddingProvider,
{
    /// Create a new cached provider.
    pub fn new(provider: P, cache: EmbeddingCache) -> Self {
        Self { provider, cache }
    }

    /// Get the underlying cache.
    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }
}

#[async_trait]
impl<P> EmbeddingProvider for CachedProvider<P>
where
    P: EmbeddingProvider,
{
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn default_model(&self) -> &str {
        self.provider.default_model()
    }

    fn default_dimension(&self) -> usize {
        self.provider.default_dimension()
    }

    fn settings_fingerprint(&self) -> String {
        self.provider.settings_fingerprint()
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string());
        let settings = match request.dimensions {
            Some(dimensions) => format!(
                "{};request_dimensions={dimensions}",
                self.provider.settings_fingerprint()
            ),
            None => self.provider.settings_fingerprint(),
        };

        if let Some(embedding) = self.cache.get(&request.text, &model, &settings).await {
            debug!("Cache hit for embedding");
            return Ok(EmbeddingResponse {
                dimension: embedding.len(),
                embedding,
                model,
                tokens_used: None,
            });
        }

        if !self.provider.is_available() {
            return Err(EmbeddingError::ProviderNotConfigured(
                self.provider.name().to_string(),
            ));
        }

        let text = request.text.clone();
        let response = self.provider.embed(request).await?;
        self.cache
            .put(&text, &model, &settings, response.embedding.clone())
            .await?;

        Ok(response)
    }

    /// Cache hits need no credentials; misses check the wrapped provider.
    fn is_available(&self) -> bool {
        true
    }
}
