//! Embedding-similarity retrieval

use async_trait::async_trait;
use std::sync::Arc;

use super::Retriever;
use crate::providers::{EmbeddingProvider, EmbeddingTask, VectorIndex};
use crate::types::RetrievalResult;

/// Dense strategy: embed the question, then nearest-neighbor search against
/// the precomputed chunk vectors.
///
/// Scores are cosine DISTANCES — lower is better, 0 is an exact match and 2
/// is an opposite vector. The guardrail relies on this orientation.
pub struct DenseRetriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl DenseRetriever {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }
}

#[async_trait]
impl Retriever for DenseRetriever {
    async fn retrieve(&self, question: &str, k: usize) -> Vec<RetrievalResult> {
        let vector = match self.embedder.embed(question, EmbeddingTask::Query).await {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!(error = %e, "Question embedding failed, degrading to no context");
                return Vec::new();
            }
        };

        match self.index.search(&vector, k).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, "Vector search failed, degrading to no context");
                Vec::new()
            }
        }
    }

    fn name(&self) -> &str {
        "dense"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::types::Chunk;

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed(&self, _text: &str, _task: EmbeddingTask) -> Result<Vec<f32>> {
            Ok(vec![0.1; 4])
        }
        fn dimensions(&self) -> usize {
            4
        }
        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        async fn embed(&self, _text: &str, _task: EmbeddingTask) -> Result<Vec<f32>> {
            Err(Error::embedding("model offline"))
        }
        fn dimensions(&self) -> usize {
            4
        }
        fn name(&self) -> &str {
            "failing"
        }
    }

    struct StubIndex(Vec<RetrievalResult>);

    #[async_trait]
    impl VectorIndex for StubIndex {
        async fn search(&self, _vector: &[f32], top_k: usize) -> Result<Vec<RetrievalResult>> {
            Ok(self.0.iter().take(top_k).cloned().collect())
        }
        fn name(&self) -> &str {
            "stub"
        }
    }

    struct FailingIndex;

    #[async_trait]
    impl VectorIndex for FailingIndex {
        async fn search(&self, _vector: &[f32], _top_k: usize) -> Result<Vec<RetrievalResult>> {
            Err(Error::vector_db("index unreachable"))
        }
        fn name(&self) -> &str {
            "down"
        }
    }

    fn result(text: &str, score: f32) -> RetrievalResult {
        RetrievalResult::new(Chunk::new(text, None), Some(score))
    }

    #[tokio::test]
    async fn returns_index_results_in_order() {
        let retriever = DenseRetriever::new(
            Arc::new(FixedEmbedder),
            Arc::new(StubIndex(vec![result("a", 0.1), result("b", 0.3)])),
        );
        let results = retriever.retrieve("who?", 3).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.text, "a");
        assert_eq!(results[0].score, Some(0.1));
    }

    #[tokio::test]
    async fn embedding_failure_degrades_to_empty() {
        let retriever = DenseRetriever::new(Arc::new(FailingEmbedder), Arc::new(FailingIndex));
        assert!(retriever.retrieve("who?", 3).await.is_empty());
    }

    #[tokio::test]
    async fn index_failure_degrades_to_empty() {
        let retriever = DenseRetriever::new(Arc::new(FixedEmbedder), Arc::new(FailingIndex));
        assert!(retriever.retrieve("who?", 3).await.is_empty());
    }
}
