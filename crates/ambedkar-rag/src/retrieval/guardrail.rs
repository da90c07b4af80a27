//! Out-of-domain guardrail
//!
//! A heuristic pre-check, not a content-safety system: when the best
//! retrieved chunk is too far from the question in embedding space, the
//! question is judged out-of-domain and generation is skipped entirely.
//! This saves the LLM call, which is the point.

use crate::types::RetrievalResult;

/// Distance-threshold guardrail.
///
/// Only meaningful for distance-scored (dense) retrieval. Lexical results
/// carry no score and are never refused — rank-only scoring has no absolute
/// notion of "too different".
#[derive(Debug, Clone, Copy)]
pub struct Guardrail {
    threshold: f32,
}

impl Guardrail {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Refuse when the top result's distance exceeds the threshold.
    ///
    /// No results or no score on the top result means no refusal; the
    /// pipeline degrades to an ungrounded prompt instead.
    pub fn should_refuse(&self, results: &[RetrievalResult]) -> bool {
        match results.first().and_then(|top| top.score) {
            Some(distance) => distance > self.threshold,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;

    fn scored(score: Option<f32>) -> Vec<RetrievalResult> {
        vec![RetrievalResult::new(Chunk::new("text", None), score)]
    }

    #[test]
    fn close_match_passes() {
        assert!(!Guardrail::new(1.4).should_refuse(&scored(Some(0.05))));
    }

    #[test]
    fn distant_match_refuses() {
        assert!(Guardrail::new(1.4).should_refuse(&scored(Some(2.0))));
    }

    #[test]
    fn threshold_itself_passes() {
        assert!(!Guardrail::new(1.4).should_refuse(&scored(Some(1.4))));
    }

    #[test]
    fn unscored_results_never_refuse() {
        assert!(!Guardrail::new(1.4).should_refuse(&scored(None)));
    }

    #[test]
    fn empty_results_never_refuse() {
        assert!(!Guardrail::new(1.4).should_refuse(&[]));
    }

    #[test]
    fn only_the_top_result_is_consulted() {
        let results = vec![
            RetrievalResult::new(Chunk::new("near", None), Some(0.2)),
            RetrievalResult::new(Chunk::new("far", None), Some(1.9)),
        ];
        assert!(!Guardrail::new(1.4).should_refuse(&results));
    }
}
