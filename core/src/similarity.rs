//! Similarity computation for embeddings.
//!
//! Embeddings arrive as `f32` but every reduction is accumulated in `f64`, so
//! squaring a large component cannot overflow and short vectors keep full
//! precision before the score is rounded.

use crate::error::{Result, SimilarityError};

/// Number of decimal digits kept in a similarity score.
pub const SCORE_DECIMALS: i32 = 3;

/// Compute the rounded cosine similarity between two embeddings.
///
/// Returns a value between -1.0 and 1.0, where:
/// - 1.0 means identical direction
/// - 0.0 means orthogonal vectors, or at least one zero vector
/// - -1.0 means opposite vectors
///
/// The score is rounded to [`SCORE_DECIMALS`] digits, half away from zero.
pub fn compute_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    raw_cosine(a, b).map(|score| round_to(score, SCORE_DECIMALS))
}

/// Compute the unrounded cosine similarity between two embeddings.
///
/// Floating-point drift can push the quotient a hair outside [-1.0, 1.0];
/// the result is clamped back into range.
pub fn raw_cosine(a: &[f32], b: &[f32]) -> Result<f64> {
    let dot = dot_product(a, b)?;
    let norm_a = l2_norm(a)?;
    let norm_b = l2_norm(b)?;

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

/// Compute the dot product between two embeddings.
pub fn dot_product(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();

    ensure_finite(dot, "dot product")
}

/// Compute the euclidean (L2) norm of an embedding.
pub fn l2_norm(v: &[f32]) -> Result<f64> {
    let sum_of_squares: f64 = v
        .iter()
        .map(|x| {
            let x = f64::from(*x);
            x * x
        })
        .sum();

    ensure_finite(sum_of_squares.sqrt(), "norm")
}

/// Round `value` to `decimals` digits after the point, half away from zero.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn ensure_finite(value: f64, quantity: &'static str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimilarityError::NonFinite { quantity })
    }
}
