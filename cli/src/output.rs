//! Writing output artifacts.

use std::path::{Path, PathBuf};

use embedsim_core::to_json_pretty;
use serde::Serialize;
use tokio::fs;
use tracing::info;

use crate::error::{PipelineError, Result};

/// Where a run wrote its artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// The `{text, embedding}` records.
    pub embeddings: PathBuf,

    /// The `{text_a, text_b, similarity}` records.
    pub similarities: PathBuf,
}

/// Write `value` to `path` as two-space indented JSON, creating parent
/// directories as needed.
pub async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = to_json_pretty(value)?;

    let io_err = |source| PipelineError::Output {
        path: path.to_path_buf(),
        source,
    };

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        _ => {}
    }

    fs::write(path, content).await.map_err(io_err)?;
    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedsim_core::TextRecord;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_write_json_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("embeddings_output.json");

        let records = vec![TextRecord::new("hi", vec![0.5, 1.0])];
        write_json(&path, &records).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "[\n  {\n    \"text\": \"hi\",\n    \"embedding\": [\n      0.5,\n      1.0\n    ]\n  }\n]"
        );
    }

    #[tokio::test]
    async fn test_write_failure_names_path() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file cannot act as a parent directory.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let err = write_json(&blocker.join("x.json"), &Vec::<TextRecord>::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Output { .. }));
    }
}
