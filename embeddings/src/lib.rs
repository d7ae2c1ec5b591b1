//! # Embeddings
//!
//! This crate turns text into embedding vectors for the similarity engine.
//!
//! ## Features
//!
//! - **Providers**: Amazon Bedrock Titan and OpenAI-compatible endpoints
//! - **Caching**: Repeated texts are embedded once
//! - **Retries**: Rate limits and transient failures are retried with backoff
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings System                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  CachedProvider ──► RetryingProvider ──► EmbeddingProvider      │
//! │       │                                        │                │
//! │       ▼                                        ▼                │
//! │  EmbeddingCache                       Bedrock Titan / OpenAI    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod bedrock;
pub mod cache;
pub mod error;
pub mod provider;
pub mod retry;

pub use bedrock::BedrockTitanProvider;
pub use cache::{CachedProvider, EmbeddingCache};
pub use embedsim_core::Embedding;
pub use error::{EmbeddingError, Result};
pub use provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, OpenAIProvider};
pub use retry::{RetryPolicy, RetryingProvider};
