//! Provider traits for the hosted services the pipeline delegates to
//!
//! The traits are object-safe and held as `Arc<dyn ...>` so that tests can
//! substitute in-process doubles for the network-backed implementations.

pub mod gemini;
pub mod qdrant;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::RetrievalResult;

pub use gemini::{GeminiCompletion, GeminiEmbedder, ModelInfo};
pub use qdrant::QdrantIndex;

/// What the embedding will be used for. Gemini weighs query and document
/// embeddings differently, so ingestion and retrieval must not share a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingTask {
    /// Embedding a user question (`RETRIEVAL_QUERY`)
    Query,
    /// Embedding a corpus chunk at ingestion time (`RETRIEVAL_DOCUMENT`)
    Document,
}

/// Trait for generating text embeddings.
///
/// Implementation: `GeminiEmbedder` (`embedding-001`, 768 dimensions).
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate the embedding for a single text
    async fn embed(&self, text: &str, task: EmbeddingTask) -> Result<Vec<f32>>;

    /// Embedding dimensions (768 for embedding-001)
    fn dimensions(&self) -> usize;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Trait for nearest-neighbor search over the precomputed chunk vectors.
///
/// Implementation: `QdrantIndex` (REST `points/query`, cosine metric).
/// Results come back best-first with `score` set to a cosine DISTANCE
/// (lower is better); adapters for similarity-scored backends must convert.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Search for the `top_k` nearest chunks to `vector`
    async fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievalResult>>;

    /// Index name for logging
    fn name(&self) -> &str;
}

/// Per-credential transport to the completion endpoint.
///
/// One call issues exactly one network request with the given key; the
/// credential-rotation loop lives above this trait in `AnswerGenerator`.
/// Implementation: `GeminiCompletion` (`models/{model}:generateContent`).
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Request one completion for `prompt` using `api_key`.
    ///
    /// An HTTP 429 maps to `Error::RateLimited`; any other non-success
    /// status, a malformed body, or an empty completion maps to
    /// `Error::Llm`.
    async fn complete(&self, prompt: &str, api_key: &str) -> Result<String>;

    /// Model name for logging
    fn model(&self) -> &str;
}
