//! Configuration for an embedsim run.
//!
//! Every field has a default, so an empty TOML file (or no file) reproduces
//! the classic run: default corpus plus `test_embed.txt`, Bedrock Titan v2 in
//! `us-west-2`, artifacts in the working directory.
//!
//! API keys never live here; providers read them from the environment.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use embedsim_core::ReportOptions;
use embedsim_embeddings::RetryPolicy;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedsimConfig {
    /// Optional text file appended to the default corpus.
    pub corpus_file: PathBuf,

    /// Directory receiving both output artifacts.
    pub output_dir: PathBuf,

    /// File name for the `{text, embedding}` artifact.
    pub embeddings_file: String,

    /// File name for the `{text_a, text_b, similarity}` artifact.
    pub similarities_file: String,

    /// Score pairs in parallel.
    pub parallel: bool,

    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: u64,

    /// Embedding provider configuration.
    pub provider: ProviderConfig,

    /// Embedding cache configuration.
    pub cache: CacheConfig,

    /// Retry policy for provider calls.
    pub retry: RetryPolicy,
}

impl Default for EmbedsimConfig {
    fn default() -> Self {
        Self {
            corpus_file: PathBuf::from("test_embed.txt"),
            output_dir: PathBuf::from("."),
            embeddings_file: "embeddings_output.json".to_string(),
            similarities_file: "cosine_similarities.json".to_string(),
            parallel: false,
            request_timeout_secs: 30,
            provider: ProviderConfig::default(),
            cache: CacheConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl EmbedsimConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| PipelineError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml(&content).map_err(|source| PipelineError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the corpus file.
    pub fn with_corpus_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.corpus_file = path.into();
        self
    }

    /// Set the provider configuration.
    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.provider = provider;
        self
    }

    /// Full path of the embeddings artifact.
    pub fn embeddings_path(&self) -> PathBuf {
        self.output_dir.join(&self.embeddings_file)
    }

    /// Full path of the similarities artifact.
    pub fn similarities_path(&self) -> PathBuf {
        self.output_dir.join(&self.similarities_file)
    }

    /// Report options derived from this configuration.
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            parallel: self.parallel,
        }
    }

    /// Reject configurations that cannot produce a run.
    pub fn validate(&self) -> Result<()> {
        if self.embeddings_file.is_empty() || self.similarities_file.is_empty() {
            return Err(PipelineError::Config(
                "output file names must not be empty".to_string(),
            ));
        }
        if self.embeddings_file == self.similarities_file {
            return Err(PipelineError::Config(format!(
                "embeddings and similarities would both be written to {}",
                self.embeddings_file
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(PipelineError::Config(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.provider.dimensions == Some(0) {
            return Err(PipelineError::Config(
                "provider.dimensions must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Which embedding service to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum ProviderKind {
    /// Amazon Bedrock Titan text embeddings.
    #[default]
    #[serde(rename = "bedrock")]
    #[value(name = "bedrock")]
    Bedrock,
    /// OpenAI (or any compatible) embeddings API.
    #[serde(rename = "openai")]
    #[value(name = "openai")]
    OpenAI,
}

/// Configuration for the embedding provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Which provider to use.
    pub kind: ProviderKind,

    /// Model to use; the provider default when unset.
    pub model: Option<String>,

    /// AWS region (Bedrock only).
    pub region: Option<String>,

    /// Endpoint override: Bedrock runtime URL or OpenAI base URL.
    pub endpoint: Option<String>,

    /// Requested output dimensions.
    pub dimensions: Option<usize>,

    /// Ask for unit-length vectors (Bedrock only).
    pub normalize: Option<bool>,
}

/// Configuration for the embedding cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether to cache embeddings.
    pub enabled: bool,

    /// Maximum cache size.
    pub max_entries: usize,

    /// Persist the cache to this file across runs.
    pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1000,
            path: None,
        }
    }
}
