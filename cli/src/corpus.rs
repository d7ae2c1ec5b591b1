//! Input corpus assembly.
//!
//! The corpus is a fixed list of default texts, optionally extended by the
//! trimmed contents of one local file.

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;
use tracing::{info, warn};

use crate::error::{PipelineError, Result};

/// Texts embedded on every run.
pub const DEFAULT_TEXTS: [&str; 4] = [
    "Hello, world!",
    "Hello Everyone!",
    "AWS Bedrock Titan embeddings are cool.",
    "This is a simple example.",
];

/// The default corpus as owned strings.
pub fn default_corpus() -> Vec<String> {
    DEFAULT_TEXTS.iter().map(|s| (*s).to_string()).collect()
}

/// Read the optional corpus file.
///
/// Returns `Ok(None)` when the file does not exist and the trimmed contents
/// otherwise. Any other I/O failure is an error, so callers can tell the two
/// apart.
pub async fn read_optional_corpus(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content.trim().to_string())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PipelineError::Corpus {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Append `extra` to `texts` unless it is missing or blank.
pub fn assemble_corpus(mut texts: Vec<String>, extra: Option<String>) -> Vec<String> {
    if let Some(extra) = extra {
        let extra = extra.trim();
        if !extra.is_empty() {
            texts.push(extra.to_string());
        }
    }
    texts
}

/// Build the run's corpus: defaults plus the optional file.
///
/// A missing file is expected and logged at `info`; an unreadable one is
/// logged at `warn`. Neither aborts the run.
pub async fn load_corpus(path: &Path) -> Vec<String> {
    let extra = match read_optional_corpus(path).await {
        Ok(Some(content)) => {
            info!("Loaded extra corpus text from {}", path.display());
            Some(content)
        }
        Ok(None) => {
            info!("{} not found, using default texts", path.display());
            None
        }
        Err(e) => {
            warn!("{e}; using default texts");
            None
        }
    };

    assemble_corpus(default_corpus(), extra)
}
