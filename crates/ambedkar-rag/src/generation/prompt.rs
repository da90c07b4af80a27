//! Prompt template for grounded answers
//!
//! Pure string assembly: persona, behavioral rules, the retrieved context
//! blocks, then the verbatim question. Deterministic for identical inputs.

use crate::types::RetrievalResult;

/// Default persona declaration.
const DEFAULT_PERSONA: &str = "You are Dr. B. R. Ambedkar, the scholar, jurist, \
and principal architect of the Indian Constitution. Answer in the first person, \
in a measured and scholarly voice.";

/// Context-section note used when retrieval produced nothing.
const NO_CONTEXT_NOTE: &str = "No corpus passages matched this question. Answer \
only from your persona's well-established public record, or decline if you \
cannot do so reliably.";

/// Builds the generation prompt from persona, rules, context, and question.
///
/// Constructed once from configuration and shared; holds no mutable state.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    persona: String,
    rules: Vec<String>,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            persona: DEFAULT_PERSONA.to_string(),
            rules: vec![
                "Answer using only the context passages below; do not invent facts.".to_string(),
                "If the question is unrelated to Dr. Ambedkar's life, work, or writings, \
                 politely decline to answer it."
                    .to_string(),
                "Keep answers concise and quote the sources when they help.".to_string(),
            ],
        }
    }
}

impl PromptBuilder {
    pub fn new(persona: impl Into<String>, rules: Vec<String>) -> Self {
        Self {
            persona: persona.into(),
            rules,
        }
    }

    /// Assemble the full prompt. Pure function of its inputs.
    pub fn build(&self, question: &str, results: &[RetrievalResult]) -> String {
        let mut prompt = String::new();

        prompt.push_str(&self.persona);
        prompt.push_str("\n\nRules:\n");
        for (i, rule) in self.rules.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, rule));
        }

        prompt.push_str("\nContext:\n");
        if results.is_empty() {
            prompt.push_str(NO_CONTEXT_NOTE);
            prompt.push('\n');
        } else {
            let blocks: Vec<String> = results
                .iter()
                .map(|result| {
                    format!(
                        "Source: {}\nText: {}",
                        result.chunk.source.as_deref().unwrap_or("Unknown"),
                        result.chunk.text
                    )
                })
                .collect();
            prompt.push_str(&blocks.join("\n\n"));
            prompt.push('\n');
        }

        prompt.push_str(&format!("\nQuestion: {}\n", question));
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, RetrievalResult};

    fn results() -> Vec<RetrievalResult> {
        vec![
            RetrievalResult::new(
                Chunk::new("Ambedkar drafted the Constitution", Some("speech1".into())),
                Some(0.1),
            ),
            RetrievalResult::new(Chunk::new("Education is a weapon", None), Some(0.4)),
        ]
    }

    #[test]
    fn prompt_contains_context_and_question() {
        let prompt = PromptBuilder::default().build("Who drafted the Constitution?", &results());
        assert!(prompt.contains("Ambedkar drafted the Constitution"));
        assert!(prompt.contains("Source: speech1"));
        assert!(prompt.contains("Question: Who drafted the Constitution?"));
    }

    #[test]
    fn missing_source_is_tagged_unknown() {
        let prompt = PromptBuilder::default().build("q", &results());
        assert!(prompt.contains("Source: Unknown\nText: Education is a weapon"));
    }

    #[test]
    fn empty_context_still_yields_valid_prompt() {
        let prompt = PromptBuilder::default().build("Who are you?", &[]);
        assert!(!prompt.is_empty());
        assert!(prompt.contains("No corpus passages matched"));
        assert!(prompt.contains("Question: Who are you?"));
    }

    #[test]
    fn identical_inputs_yield_byte_identical_prompts() {
        let builder = PromptBuilder::default();
        let a = builder.build("Who drafted the Constitution?", &results());
        let b = builder.build("Who drafted the Constitution?", &results());
        assert_eq!(a, b);
    }

    #[test]
    fn rules_are_numbered_in_order() {
        let builder = PromptBuilder::new("Persona.", vec!["first".into(), "second".into()]);
        let prompt = builder.build("q", &[]);
        assert!(prompt.contains("1. first\n2. second\n"));
    }
}
