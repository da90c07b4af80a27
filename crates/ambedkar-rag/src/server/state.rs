//! Application state for the HTTP server
//!
//! All providers are constructed here, once, from configuration — no
//! module-level globals — and handed into the pipeline by ownership.

use std::sync::Arc;

use crate::config::{RagConfig, RetrievalStrategy};
use crate::corpus::Corpus;
use crate::error::Result;
use crate::generation::{AnswerGenerator, PromptBuilder};
use crate::pipeline::AnswerPipeline;
use crate::providers::{GeminiCompletion, GeminiEmbedder, QdrantIndex};
use crate::retrieval::{DenseRetriever, Guardrail, LexicalRetriever, Retriever};
use crate::speech::Synthesizer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pipeline: AnswerPipeline,
    synthesizer: Option<Arc<Synthesizer>>,
    config: RagConfig,
}

impl AppState {
    /// Build all providers and the pipeline from configuration.
    pub fn new(config: RagConfig) -> Result<Self> {
        let retriever: Arc<dyn Retriever> = match config.retrieval.strategy {
            RetrievalStrategy::Dense => {
                tracing::info!(
                    collection = %config.qdrant.collection,
                    "Using dense retrieval (Gemini embeddings + Qdrant)"
                );
                // Embeddings always use the first credential; rotation only
                // applies to generation.
                let embed_key = config.gemini.api_keys.first().cloned().unwrap_or_default();
                let embedder = Arc::new(GeminiEmbedder::new(&config.gemini, embed_key)?);
                let index = Arc::new(QdrantIndex::new(&config.qdrant)?);
                Arc::new(DenseRetriever::new(embedder, index))
            }
            RetrievalStrategy::Lexical => {
                tracing::info!(
                    path = %config.retrieval.corpus_path.display(),
                    "Using lexical retrieval over the local corpus"
                );
                let corpus = Arc::new(Corpus::load(&config.retrieval.corpus_path)?);
                Arc::new(LexicalRetriever::new(corpus))
            }
        };

        let backend = Arc::new(GeminiCompletion::new(&config.gemini)?);
        let generator = AnswerGenerator::new(backend, &config.gemini);
        let pipeline = AnswerPipeline::new(
            retriever,
            Guardrail::new(config.retrieval.guardrail_threshold),
            PromptBuilder::default(),
            generator,
            config.retrieval.top_k,
        );

        let synthesizer = if config.speech.enabled {
            match Synthesizer::new(&config.speech) {
                Ok(synth) => Some(Arc::new(synth)),
                Err(e) => {
                    tracing::warn!(error = %e, "Speech synthesis disabled");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            inner: Arc::new(AppStateInner {
                pipeline,
                synthesizer,
                config,
            }),
        })
    }

    pub fn pipeline(&self) -> &AnswerPipeline {
        &self.inner.pipeline
    }

    pub fn synthesizer(&self) -> Option<Arc<Synthesizer>> {
        self.inner.synthesizer.clone()
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }
}
