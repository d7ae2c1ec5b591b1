//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{EmbedsimConfig, ProviderKind};
use crate::error::Result;

/// Embed a set of texts and write their pairwise cosine similarities.
#[derive(Debug, Parser)]
#[command(name = "embedsim", version, about)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "EMBEDSIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Optional text file appended to the default corpus.
    #[arg(long)]
    pub corpus_file: Option<PathBuf>,

    /// Directory for the output artifacts.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Embedding provider.
    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    /// Model ID for the provider.
    #[arg(long)]
    pub model: Option<String>,

    /// AWS region for Bedrock.
    #[arg(long)]
    pub region: Option<String>,

    /// Endpoint override for the provider.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Score pairs in parallel.
    #[arg(long)]
    pub parallel: bool,

    /// Disable the embedding cache.
    #[arg(long)]
    pub no_cache: bool,
}

impl Cli {
    /// Resolve the effective configuration: file (or defaults), then flags.
    pub fn into_config(self) -> Result<EmbedsimConfig> {
        let mut config = EmbedsimConfig::load_or_default(self.config.as_deref())?;

        if let Some(path) = self.corpus_file {
            config.corpus_file = path;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(kind) = self.provider {
            if kind != config.provider.kind {
                // Model names do not carry over between providers.
                config.provider.model = None;
            }
            config.provider.kind = kind;
        }
        if let Some(model) = self.model {
            config.provider.model = Some(model);
        }
        if let Some(region) = self.region {
            config.provider.region = Some(region);
        }
        if let Some(endpoint) = self.endpoint {
            config.provider.endpoint = Some(endpoint);
        }
        if self.parallel {
            config.parallel = true;
        }
        if self.no_cache {
            config.cache.enabled = false;
        }

        config.validate()?;
        Ok(config)
    }
}
