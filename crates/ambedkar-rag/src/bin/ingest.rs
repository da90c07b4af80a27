//! Offline corpus ingestion
//!
//! Reads a JSON file of `{text, source}` chunks, embeds every chunk with the
//! document task type, recreates the Qdrant collection, and upserts the
//! vectors with positional IDs. The serving pipeline treats the result as
//! immutable.
//!
//! Run with: cargo run -p ambedkar-rag --bin ambedkar-rag-ingest

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ambedkar_rag::config::RagConfig;
use ambedkar_rag::corpus::Corpus;
use ambedkar_rag::providers::{EmbeddingProvider, EmbeddingTask, GeminiEmbedder, QdrantIndex};

#[derive(Parser)]
#[command(name = "ambedkar-rag-ingest", about = "Embed a JSON corpus and upload it to Qdrant")]
struct Args {
    /// Corpus JSON file; defaults to CORPUS_PATH from the environment
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Collection name override
    #[arg(long)]
    collection: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ambedkar_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = RagConfig::from_env();
    if let Some(collection) = args.collection {
        config.qdrant.collection = collection;
    }
    let corpus_path = args.corpus.unwrap_or_else(|| config.retrieval.corpus_path.clone());

    let Some(api_key) = config.gemini.api_keys.first().cloned() else {
        bail!("GEMINI_API_KEY is not set");
    };

    let corpus = Corpus::load(&corpus_path)
        .with_context(|| format!("loading corpus from {}", corpus_path.display()))?;
    if corpus.is_empty() {
        bail!("corpus at {} is empty", corpus_path.display());
    }

    let embedder = GeminiEmbedder::new(&config.gemini, api_key)?;
    let index = QdrantIndex::new(&config.qdrant)?;

    tracing::info!(
        collection = %config.qdrant.collection,
        dimensions = embedder.dimensions(),
        "Recreating collection"
    );
    index.recreate_collection(embedder.dimensions()).await?;

    tracing::info!(chunks = corpus.len(), "Embedding corpus");
    let mut vectors = Vec::with_capacity(corpus.len());
    for (i, chunk) in corpus.chunks().iter().enumerate() {
        let vector = embedder
            .embed(&chunk.text, EmbeddingTask::Document)
            .await
            .with_context(|| format!("embedding chunk {}", i))?;
        vectors.push(vector);
        if (i + 1) % 25 == 0 {
            tracing::info!("Embedded {}/{} chunks", i + 1, corpus.len());
        }
    }

    tracing::info!("Uploading {} points", vectors.len());
    index.upsert(corpus.chunks(), &vectors).await?;

    tracing::info!("Ingestion complete");
    Ok(())
}
