//! Shared data types for the pipeline and the HTTP API

use serde::{Deserialize, Serialize};

/// A single corpus passage with its source attribution.
///
/// Chunks are produced by the offline ingestion job and never mutated at
/// query time. Identity is positional: a chunk's point ID in the vector
/// collection is its index in the corpus file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// The passage text
    pub text: String,
    /// Where the passage came from (speech title, book, etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Chunk {
    pub fn new(text: impl Into<String>, source: Option<String>) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

/// One retrieved chunk with its relevance score.
///
/// Score semantics depend on the retrieval strategy: the dense retriever
/// reports a cosine distance where lower is better (0 = exact match), while
/// the lexical retriever has no comparable absolute scale and reports `None`.
/// The asymmetry is deliberate and consumed by the guardrail.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalResult {
    pub chunk: Chunk,
    pub score: Option<f32>,
}

impl RetrievalResult {
    pub fn new(chunk: Chunk, score: Option<f32>) -> Self {
        Self { chunk, score }
    }
}

/// Request body for `POST /ask`
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Response body for `POST /ask`
#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub question: String,
    pub answer: String,
    /// URL of the spoken answer, present when speech synthesis is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}
