//! Error types for the similarity engine.

use thiserror::Error;

/// Result type alias for similarity operations.
pub type Result<T> = std::result::Result<T, SimilarityError>;

/// Errors that can occur while scoring embeddings.
///
/// Every variant signals invalid input. A zero-length vector is not an error:
/// it scores `0.0`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimilarityError {
    /// The two vectors have different lengths.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A NaN or infinity showed up in an intermediate value.
    #[error("non-finite {quantity} encountered")]
    NonFinite { quantity: &'static str },

    /// Scoring a specific pair of records failed.
    #[error("invalid pair ({first}, {second}): {source}")]
    Pair {
        first: usize,
        second: usize,
        #[source]
        source: Box<SimilarityError>,
    },
}

impl SimilarityError {
    /// Attach the input positions of the pair being scored.
    pub(crate) fn at_pair(self, first: usize, second: usize) -> Self {
        Self::Pair {
            first,
            second,
            source: Box::new(self),
        }
    }

    /// The underlying error, with any pair context stripped.
    pub fn root(&self) -> &SimilarityError {
        match self {
            Self::Pair { source, .. } => source.root(),
            other => other,
        }
    }
}
