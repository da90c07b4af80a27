//! The answer-orchestration pipeline
//!
//! `answer_question` is the contract the HTTP layer is built on: it always
//! resolves to a non-empty string and never returns an error or panics.
//! Every failure path maps to a fixed, user-visible message.

use std::sync::Arc;

use crate::generation::{AnswerGenerator, PromptBuilder};
use crate::retrieval::{Guardrail, Retriever};

/// Returned when no API credential is configured.
pub const MISSING_KEY_MESSAGE: &str = "Error: GEMINI_API_KEY is missing.";

/// Returned when the guardrail judges the question out-of-domain.
pub const REFUSAL_MESSAGE: &str = "I can only speak to questions about my own \
life, work, and writings. Please ask me something about those.";

/// Returned when every credential has been exhausted without a completion.
pub const GENERATION_FAILED_MESSAGE: &str = "Sorry, I could not reach the \
language model right now. Please try again in a moment.";

/// Retrieval → guardrail → prompt → guarded generation.
pub struct AnswerPipeline {
    retriever: Arc<dyn Retriever>,
    guardrail: Guardrail,
    prompt_builder: PromptBuilder,
    generator: AnswerGenerator,
    top_k: usize,
}

impl AnswerPipeline {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        guardrail: Guardrail,
        prompt_builder: PromptBuilder,
        generator: AnswerGenerator,
        top_k: usize,
    ) -> Self {
        Self {
            retriever,
            guardrail,
            prompt_builder,
            generator,
            top_k,
        }
    }

    /// Answer one question. Infallible by contract: the result is always a
    /// non-empty string, whatever went wrong underneath.
    pub async fn answer_question(&self, question: &str) -> String {
        if !self.generator.has_credentials() {
            return MISSING_KEY_MESSAGE.to_string();
        }

        let results = self.retriever.retrieve(question, self.top_k).await;
        tracing::debug!(
            strategy = self.retriever.name(),
            retrieved = results.len(),
            "Retrieval complete"
        );

        if self.guardrail.should_refuse(&results) {
            tracing::info!(
                top_score = ?results.first().and_then(|r| r.score),
                "Guardrail refused question"
            );
            return REFUSAL_MESSAGE.to_string();
        }

        let prompt = self.prompt_builder.build(question, &results);

        match self.generator.generate(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!(error = %e, "All credentials exhausted");
                GENERATION_FAILED_MESSAGE.to_string()
            }
        }
    }
}
