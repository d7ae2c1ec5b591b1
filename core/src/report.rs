//! Pairwise enumeration and report construction.
//!
//! Pairs are always enumerated in canonical order: outer index `i` over the
//! input, inner index `j` from `i + 1`. The first pair of a report is
//! `(0, 1)` and the last is `(n - 2, n - 1)`.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::TextRecord;
use crate::error::Result;
use crate::similarity::compute_similarity;

/// Similarity score for one unordered pair of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityPair {
    /// Input position of the first record.
    pub first: usize,

    /// Input position of the second record. Always greater than `first`.
    pub second: usize,

    /// Text of the first record.
    pub text_a: String,

    /// Text of the second record.
    pub text_b: String,

    /// Cosine similarity, rounded.
    pub score: f64,
}

/// All pairwise scores for one batch of records, in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityReport {
    pairs: Vec<SimilarityPair>,
}

impl SimilarityReport {
    /// The pairs in canonical order.
    pub fn pairs(&self) -> &[SimilarityPair] {
        &self.pairs
    }

    /// Consume the report, returning its pairs.
    pub fn into_pairs(self) -> Vec<SimilarityPair> {
        self.pairs
    }

    /// Iterate over the pairs in canonical order.
    pub fn iter(&self) -> std::slice::Iter<'_, SimilarityPair> {
        self.pairs.iter()
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if the report has no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Look up the pair built from the records at positions `first` and
    /// `second`, in either order.
    pub fn get(&self, first: usize, second: usize) -> Option<&SimilarityPair> {
        let (first, second) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };
        self.pairs
            .iter()
            .find(|p| p.first == first && p.second == second)
    }

    /// Find the first pair whose texts match, in either order.
    pub fn find(&self, text_a: &str, text_b: &str) -> Option<&SimilarityPair> {
        self.pairs.iter().find(|p| {
            (p.text_a == text_a && p.text_b == text_b) || (p.text_a == text_b && p.text_b == text_a)
        })
    }
}

impl<'a> IntoIterator for &'a SimilarityReport {
    type Item = &'a SimilarityPair;
    type IntoIter = std::slice::Iter<'a, SimilarityPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Options for [`build_report_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Score pairs on the rayon thread pool.
    pub parallel: bool,
}

impl ReportOptions {
    /// Enable parallel scoring.
    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }
}

/// Number of unordered pairs among `n` records.
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Build a report with the strategy chosen by `options`.
pub fn build_report_with(records: &[TextRecord], options: ReportOptions) -> Result<SimilarityReport> {
    if options.parallel {
        build_report_parallel(records)
    } else {
        build_report(records)
    }
}

/// Score every unordered pair of `records`, sequentially.
///
/// Fewer than two records yield an empty report. The first pair that fails
/// to score aborts the build; no partial report is returned.
pub fn build_report(records: &[TextRecord]) -> Result<SimilarityReport> {
    let mut pairs = Vec::with_capacity(pair_count(records.len()));

    for (i, a) in records.iter().enumerate() {
        for (j, b) in records.iter().enumerate().skip(i + 1) {
            pairs.push(score_pair(i, a, j, b)?);
        }
    }

    debug!(
        "Built similarity report: {} records, {} pairs",
        records.len(),
        pairs.len()
    );

    Ok(SimilarityReport { pairs })
}

/// Score every unordered pair of `records` on the rayon thread pool.
///
/// Produces exactly what [`build_report`] produces. Results land in a buffer
/// indexed by canonical position, so ordering is preserved and, when several
/// pairs are invalid, the reported error is the one `build_report` would hit
/// first.
pub fn build_report_parallel(records: &[TextRecord]) -> Result<SimilarityReport> {
    let n = records.len();
    let positions: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .collect();

    let scored: Vec<Result<SimilarityPair>> = positions
        .into_par_iter()
        .map(|(i, j)| score_pair(i, &records[i], j, &records[j]))
        .collect();

    let pairs = scored.into_iter().collect::<Result<Vec<_>>>()?;

    debug!(
        "Built similarity report in parallel: {n} records, {} pairs",
        pairs.len()
    );

    Ok(SimilarityReport { pairs })
}

fn score_pair(i: usize, a: &TextRecord, j: usize, b: &TextRecord) -> Result<SimilarityPair> {
    let score = compute_similarity(&a.embedding, &b.embedding).map_err(|e| e.at_pair(i, j))?;

    Ok(SimilarityPair {
        first: i,
        second: j,
        text_a: a.text.clone(),
        text_b: b.text.clone(),
        score,
    })
}
