//! Projection of reports into serializable records.

use serde::{Deserialize, Serialize};

use crate::report::{SimilarityPair, SimilarityReport};

/// The persisted form of one scored pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityRecord {
    /// Text of the first record.
    pub text_a: String,

    /// Text of the second record.
    pub text_b: String,

    /// Rounded cosine similarity.
    pub similarity: f64,
}

impl From<SimilarityPair> for SimilarityRecord {
    fn from(pair: SimilarityPair) -> Self {
        Self {
            text_a: pair.text_a,
            text_b: pair.text_b,
            similarity: pair.score,
        }
    }
}

impl From<&SimilarityPair> for SimilarityRecord {
    fn from(pair: &SimilarityPair) -> Self {
        Self {
            text_a: pair.text_a.clone(),
            text_b: pair.text_b.clone(),
            similarity: pair.score,
        }
    }
}

impl SimilarityReport {
    /// Project every pair into a [`SimilarityRecord`], keeping report order.
    pub fn to_records(&self) -> Vec<SimilarityRecord> {
        self.iter().map(SimilarityRecord::from).collect()
    }

    /// Consuming variant of [`SimilarityReport::to_records`].
    pub fn into_records(self) -> Vec<SimilarityRecord> {
        self.into_pairs()
            .into_iter()
            .map(SimilarityRecord::from)
            .collect()
    }
}

/// Serialize any artifact as JSON indented by two spaces.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TextRecord, build_report};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_records_follow_report_order() {
        let records = vec![
            TextRecord::new("a", vec![1.0, 0.0]),
            TextRecord::new("b", vec![1.0, 1.0]),
            TextRecord::new("c", vec![0.0, 1.0]),
        ];
        let report = build_report(&records).unwrap();

        let projected = report.to_records();
        let names: Vec<(&str, &str)> = projected
            .iter()
            .map(|r| (r.text_a.as_str(), r.text_b.as_str()))
            .collect();
        assert_eq!(names, vec![("a", "b"), ("a", "c"), ("b", "c")]);
        assert_eq!(projected[0].similarity, 0.707);
        assert_eq!(projected[1].similarity, 0.0);

        assert_eq!(report.into_records(), projected);
    }

    #[test]
    fn test_json_shape() {
        let record = SimilarityRecord {
            text_a: "hello".to_string(),
            text_b: "bye".to_string(),
            similarity: -1.0,
        };

        let json = to_json_pretty(&vec![record]).unwrap();
        assert_eq!(
            json,
            "[\n  {\n    \"text_a\": \"hello\",\n    \"text_b\": \"bye\",\n    \"similarity\": -1.0\n  }\n]"
        );
    }

    #[test]
    fn test_empty_report_serializes_to_empty_array() {
        let report = build_report(&[]).unwrap();
        assert_eq!(to_json_pretty(&report.to_records()).unwrap(), "[]");
    }
}
