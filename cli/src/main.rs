//! embedsim: embed a small corpus and write pairwise cosine similarities.

use anyhow::Context;
use clap::Parser;
use embedsim_cli::{Cli, Pipeline, build_provider};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal; keys may already be in the environment.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Cli::parse()
        .into_config()
        .context("failed to resolve configuration")?;

    let provider = build_provider(&config)
        .await
        .context("failed to set up embedding provider")?;

    let pipeline = Pipeline::new(config, provider);
    let (output, paths) = pipeline.execute().await.context("embedsim run failed")?;

    for record in &output.similarities {
        println!(
            "{:>7.3}  {}  <->  {}",
            record.similarity, record.text_a, record.text_b
        );
    }

    info!(
        "Wrote {} embeddings to {} and {} similarities to {}",
        output.records.len(),
        paths.embeddings.display(),
        output.similarities.len(),
        paths.similarities.display()
    );

    Ok(())
}
