//! Term-frequency retrieval over the local corpus
//!
//! No vectors involved: chunks are ranked by the total number of query-term
//! occurrences in their text. Rank order is meaningful but the counts have
//! no absolute scale, so results carry `score: None` and the guardrail
//! never fires for this strategy.

use async_trait::async_trait;
use std::sync::Arc;

use super::Retriever;
use crate::corpus::Corpus;
use crate::types::RetrievalResult;

/// Lexical strategy over the in-memory corpus.
pub struct LexicalRetriever {
    corpus: Arc<Corpus>,
}

impl LexicalRetriever {
    pub fn new(corpus: Arc<Corpus>) -> Self {
        Self { corpus }
    }

    /// Total occurrences of all query terms in `text` (both lowercased).
    fn term_frequency(terms: &[String], text: &str) -> usize {
        let haystack = text.to_lowercase();
        terms
            .iter()
            .map(|term| haystack.matches(term.as_str()).count())
            .sum()
    }
}

#[async_trait]
impl Retriever for LexicalRetriever {
    async fn retrieve(&self, question: &str, k: usize) -> Vec<RetrievalResult> {
        let terms: Vec<String> = question
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, usize)> = self
            .corpus
            .chunks()
            .iter()
            .enumerate()
            .map(|(idx, chunk)| (idx, Self::term_frequency(&terms, &chunk.text)))
            .filter(|(_, count)| *count > 0)
            .collect();

        // Stable sort keeps corpus order among ties.
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(idx, _)| RetrievalResult::new(self.corpus.chunks()[idx].clone(), None))
            .collect()
    }

    fn name(&self) -> &str {
        "lexical"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;

    fn corpus() -> Arc<Corpus> {
        Arc::new(Corpus::new(vec![
            Chunk::new("Education agitate organize", None),
            Chunk::new(
                "Education for all; education is the milk of a lioness",
                Some("speeches".into()),
            ),
            Chunk::new(
                "The Constitution was drafted by the drafting committee",
                Some("speech1".into()),
            ),
        ]))
    }

    #[tokio::test]
    async fn ranks_by_descending_term_frequency() {
        let retriever = LexicalRetriever::new(corpus());
        let results = retriever.retrieve("Education", 3).await;
        // Two chunks match; the double mention outranks the single one.
        assert_eq!(results.len(), 2);
        assert!(results[0].chunk.text.starts_with("Education for all"));
        assert!(results[1].chunk.text.starts_with("Education agitate"));
    }

    #[tokio::test]
    async fn drops_zero_match_chunks() {
        let retriever = LexicalRetriever::new(corpus());
        let results = retriever.retrieve("constitution drafted", 3).await;
        assert_eq!(results.len(), 1);
        assert!(results[0].chunk.text.contains("Constitution"));
    }

    #[tokio::test]
    async fn truncates_to_k() {
        let retriever = LexicalRetriever::new(corpus());
        let results = retriever.retrieve("education", 1).await;
        assert_eq!(results.len(), 1);
        assert!(results[0].chunk.text.starts_with("Education for all"));
    }

    #[tokio::test]
    async fn scores_are_always_none() {
        let retriever = LexicalRetriever::new(corpus());
        let results = retriever.retrieve("education", 3).await;
        assert!(results.iter().all(|r| r.score.is_none()));
    }

    #[tokio::test]
    async fn unmatched_and_empty_questions_return_empty() {
        let retriever = LexicalRetriever::new(corpus());
        assert!(retriever.retrieve("quantum chromodynamics", 3).await.is_empty());
        assert!(retriever.retrieve("", 3).await.is_empty());
        assert!(retriever.retrieve("   ", 3).await.is_empty());
    }
}
