//! The embed, score, persist pipeline.

use std::sync::Arc;
use std::time::Instant;

use embedsim_core::{SimilarityRecord, TextRecord, build_report_with};
use embedsim_embeddings::{EmbeddingError, EmbeddingProvider};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EmbedsimConfig;
use crate::corpus::load_corpus;
use crate::error::Result;
use crate::output::{ArtifactPaths, write_json};

/// Counters describing one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Number of texts embedded.
    pub texts: usize,

    /// Number of scored pairs.
    pub pairs: usize,

    /// Embedding dimension, when at least one text was embedded.
    pub dimension: Option<usize>,

    /// Wall-clock time for embedding and scoring.
    pub elapsed_ms: u64,
}

/// Everything a run produced, before persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// One record per input text, in input order.
    pub records: Vec<TextRecord>,

    /// One record per unordered pair, in canonical order.
    pub similarities: Vec<SimilarityRecord>,

    /// Run counters.
    pub stats: RunStats,
}

/// Orchestrates a run against an injected provider.
pub struct Pipeline {
    config: EmbedsimConfig,
    provider: Arc<dyn EmbeddingProvider>,
}

impl Pipeline {
    /// Create a pipeline.
    pub fn new(config: EmbedsimConfig, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { config, provider }
    }

    /// The active configuration.
    pub fn config(&self) -> &EmbedsimConfig {
        &self.config
    }

    /// Embed `texts` one by one, in order.
    ///
    /// The first provider failure aborts the run. A cached provider reports
    /// itself available, so a corpus served entirely from the cache runs
    /// without credentials; the first miss still fails without them.
    pub async fn embed_texts(&self, texts: &[String]) -> Result<Vec<TextRecord>> {
        if !texts.is_empty() && !self.provider.is_available() {
            return Err(EmbeddingError::ProviderNotConfigured(self.provider.name().to_string()).into());
        }

        let mut records = Vec::with_capacity(texts.len());
        for (i, text) in texts.iter().enumerate() {
            debug!("Embedding text {}/{}", i + 1, texts.len());
            let embedding = self.provider.get_embedding(text).await?;
            records.push(TextRecord::new(text.clone(), embedding));
        }
        Ok(records)
    }

    /// Embed and score `texts`.
    pub async fn run(&self, texts: &[String]) -> Result<PipelineOutput> {
        let started = Instant::now();
        info!("Embedding {} texts", texts.len());

        let records = self.embed_texts(texts).await?;
        let report = build_report_with(&records, self.config.report_options())?;

        let stats = RunStats {
            texts: records.len(),
            pairs: report.len(),
            dimension: records.first().map(TextRecord::dimension),
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        info!(
            "Scored {} pairs across {} texts in {}ms",
            stats.pairs, stats.texts, stats.elapsed_ms
        );

        Ok(PipelineOutput {
            records,
            similarities: report.into_records(),
            stats,
        })
    }

    /// Write both artifacts for `output`.
    pub async fn persist(&self, output: &PipelineOutput) -> Result<ArtifactPaths> {
        let paths = ArtifactPaths {
            embeddings: self.config.embeddings_path(),
            similarities: self.config.similarities_path(),
        };

        write_json(&paths.embeddings, &output.records).await?;
        write_json(&paths.similarities, &output.similarities).await?;

        Ok(paths)
    }

    /// Full run: assemble the corpus, embed, score, persist.
    pub async fn execute(&self) -> Result<(PipelineOutput, ArtifactPaths)> {
        let texts = load_corpus(&self.config.corpus_file).await;
        let output = self.run(&texts).await?;
        let paths = self.persist(&output).await?;
        Ok((output, paths))
    }
}
