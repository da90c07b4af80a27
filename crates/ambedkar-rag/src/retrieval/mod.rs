//! Retrieval strategies and the out-of-domain guardrail

pub mod dense;
pub mod guardrail;
pub mod lexical;

use async_trait::async_trait;

use crate::types::RetrievalResult;

pub use dense::DenseRetriever;
pub use guardrail::Guardrail;
pub use lexical::LexicalRetriever;

/// Maps a question to ranked relevant chunks.
///
/// Results are ordered best-first with length ≤ `k`. Retrieval never fails
/// from the caller's point of view: implementations catch their own errors,
/// log them, and return an empty vector, which the pipeline treats as
/// "no grounding available".
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, question: &str, k: usize) -> Vec<RetrievalResult>;

    /// Strategy name for logging
    fn name(&self) -> &str;
}
