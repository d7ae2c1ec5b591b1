//! Behavioral tests for the similarity engine.
//!
//! Each test drives the public API the way the orchestrator does: build
//! records, score them, and check the report against known geometry.

use embedsim_core::{
    ReportOptions, SimilarityError, TextRecord, build_report, build_report_with,
    compute_similarity, pair_count,
};
use pretty_assertions::assert_eq;

/// A small deterministic pseudo-random vector set, no external RNG needed.
fn sample_vectors(count: usize, dimension: usize) -> Vec<Vec<f32>> {
    let mut state: u32 = 0x9E37_79B9;
    (0..count)
        .map(|_| {
            (0..dimension)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 17;
                    state ^= state << 5;
                    (state % 2000) as f32 / 1000.0 - 1.0
                })
                .collect()
        })
        .collect()
}

#[test]
fn test_greeting_scenario() {
    let records = vec![
        TextRecord::new("hello", vec![1.0, 0.0, 0.0]),
        TextRecord::new("hi", vec![0.9, 0.1, 0.0]),
        TextRecord::new("bye", vec![-1.0, 0.0, 0.0]),
    ];

    let report = build_report(&records).unwrap();
    assert_eq!(report.len(), 3);

    let scores: Vec<(&str, &str, f64)> = report
        .iter()
        .map(|p| (p.text_a.as_str(), p.text_b.as_str(), p.score))
        .collect();
    assert_eq!(
        scores,
        vec![
            ("hello", "hi", 0.994),
            ("hello", "bye", -1.0),
            ("hi", "bye", -0.994),
        ]
    );
}

#[test]
fn test_symmetry_and_range() {
    let vectors = sample_vectors(8, 16);
    for a in &vectors {
        for b in &vectors {
            let ab = compute_similarity(a, b).unwrap();
            let ba = compute_similarity(b, a).unwrap();
            assert_eq!(ab, ba);
            assert!((-1.0..=1.0).contains(&ab), "score out of range: {ab}");
        }
    }
}

#[test]
fn test_self_similarity() {
    for v in sample_vectors(10, 32) {
        assert_eq!(compute_similarity(&v, &v).unwrap(), 1.0);
    }
}

#[test]
fn test_zero_vector_against_anything() {
    let zero = vec![0.0f32; 16];
    for v in sample_vectors(5, 16) {
        assert_eq!(compute_similarity(&v, &zero).unwrap(), 0.0);
    }
}

#[test]
fn test_pair_counts_for_growing_batches() {
    let vectors = sample_vectors(9, 4);
    for n in 0..=vectors.len() {
        let records: Vec<TextRecord> = vectors[..n]
            .iter()
            .enumerate()
            .map(|(i, v)| TextRecord::new(format!("text {i}"), v.clone()))
            .collect();

        let report = build_report(&records).unwrap();
        assert_eq!(report.len(), n * n.saturating_sub(1) / 2);
        assert_eq!(report.len(), pair_count(n));

        if n >= 2 {
            let first = &report.pairs()[0];
            let last = &report.pairs()[report.len() - 1];
            assert_eq!((first.first, first.second), (0, 1));
            assert_eq!((last.first, last.second), (n - 2, n - 1));
        }
    }
}

#[test]
fn test_inputs_are_left_untouched() {
    let records = vec![
        TextRecord::new("a", vec![3.0, 4.0]),
        TextRecord::new("b", vec![-4.0, 3.0]),
    ];
    let before = records.clone();

    build_report_with(&records, ReportOptions::default().parallel()).unwrap();
    assert_eq!(records, before);
}

#[test]
fn test_mismatched_dimensions_fail_fast() {
    let records = vec![
        TextRecord::new("two", vec![1.0, 0.0]),
        TextRecord::new("three", vec![1.0, 0.0, 0.0]),
    ];

    let err = build_report(&records).unwrap_err();
    assert_eq!(
        err.root(),
        &SimilarityError::DimensionMismatch {
            expected: 2,
            actual: 3
        }
    );
    assert_eq!(
        err.to_string(),
        "invalid pair (0, 1): dimension mismatch: expected 2, got 3"
    );
}
