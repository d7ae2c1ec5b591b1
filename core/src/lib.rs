//! # Embedsim Core
//!
//! Pure computation for pairwise embedding similarity: given texts that have
//! already been embedded, score every unordered pair with cosine similarity
//! and shape the result into serializable records.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Similarity Engine                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  [TextRecord] ──► build_report ──► SimilarityReport             │
//! │                        │                  │                     │
//! │                        ▼                  ▼                     │
//! │              compute_similarity   [SimilarityRecord]            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here performs I/O. Acquiring vectors lives in
//! `embedsim-embeddings`, persisting artifacts in `embedsim-cli`.
//!
//! ## Usage
//!
//! ```rust
//! use embedsim_core::{TextRecord, build_report};
//!
//! let records = vec![
//!     TextRecord::new("hello", vec![1.0, 0.0, 0.0]),
//!     TextRecord::new("bye", vec![-1.0, 0.0, 0.0]),
//! ];
//!
//! let report = build_report(&records)?;
//! assert_eq!(report.len(), 1);
//! assert_eq!(report.pairs()[0].score, -1.0);
//! # Ok::<(), embedsim_core::SimilarityError>(())
//! ```

pub mod error;
pub mod projection;
pub mod report;
pub mod similarity;

pub use error::{Result, SimilarityError};
pub use projection::{SimilarityRecord, to_json_pretty};
pub use report::{
    ReportOptions, SimilarityPair, SimilarityReport, build_report, build_report_parallel,
    build_report_with, pair_count,
};
pub use similarity::{SCORE_DECIMALS, compute_similarity, dot_product, l2_norm, raw_cosine};

use serde::{Deserialize, Serialize};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// A text paired with its embedding.
///
/// The text doubles as the display key in reports. It is not required to be
/// unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    /// The source text.
    pub text: String,

    /// The embedding produced for `text`.
    pub embedding: Embedding,
}

impl TextRecord {
    /// Create a new record.
    pub fn new(text: impl Into<String>, embedding: Embedding) -> Self {
        Self {
            text: text.into(),
            embedding,
        }
    }

    /// Dimension of the embedding.
    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}
