//! # Embedsim CLI
//!
//! Orchestration around the similarity engine: assemble the corpus, embed
//! every text through one provider, score all pairs, and persist
//! `embeddings_output.json` and `cosine_similarities.json`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use embedsim_cli::{EmbedsimConfig, Pipeline, build_provider};
//!
//! let config = EmbedsimConfig::load_or_default(None)?;
//! let provider = build_provider(&config).await?;
//! let (output, paths) = Pipeline::new(config, provider).execute().await?;
//! ```

pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod provider;

pub use cli::Cli;
pub use config::{CacheConfig, EmbedsimConfig, ProviderConfig, ProviderKind};
pub use corpus::{DEFAULT_TEXTS, assemble_corpus, default_corpus, load_corpus, read_optional_corpus};
pub use error::{PipelineError, Result};
pub use output::{ArtifactPaths, write_json};
pub use pipeline::{Pipeline, PipelineOutput, RunStats};
pub use provider::build_provider;
