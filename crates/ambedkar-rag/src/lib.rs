//! ambedkar-rag: retrieval-augmented question answering about Dr. Ambedkar
//!
//! The core is the answer-orchestration pipeline: retrieve relevant corpus
//! chunks, run an out-of-domain guardrail, build a persona prompt, and call
//! Gemini with credential rotation. An axum server exposes the pipeline over
//! `POST /ask` with detached speech synthesis for spoken answers.

pub mod config;
pub mod corpus;
pub mod error;
pub mod generation;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod speech;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use pipeline::AnswerPipeline;
pub use types::{AskRequest, AskResponse, Chunk, RetrievalResult};
