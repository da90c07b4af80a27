//! Gemini REST clients for embeddings and answer generation
//!
//! Both clients talk to the Generative Language API directly. Auth is a
//! `?key=API_KEY` query parameter, not a header. The completion client is
//! deliberately key-less: the rotation loop passes a key per call.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{CompletionBackend, EmbeddingProvider, EmbeddingTask};
use crate::config::GeminiConfig;
use crate::error::{Error, Result};

/// Dimensions of `embedding-001` vectors.
const EMBEDDING_DIMENSIONS: usize = 768;

fn build_client(timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

// ---------------------------------------------------------------------------
// Embeddings
// ---------------------------------------------------------------------------

/// Gemini `embedContent` client.
pub struct GeminiEmbedder {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiEmbedder {
    /// Create an embedder bound to a single API key.
    ///
    /// Embeddings are cheap relative to generation and are not rotated; the
    /// first configured credential is used for every request.
    pub fn new(config: &GeminiConfig, api_key: String) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            base_url: config.base_url.clone(),
            model: config.embed_model.clone(),
            api_key,
        })
    }
}

#[derive(Serialize)]
struct EmbedContentRequest {
    model: String,
    content: ContentBody,
    #[serde(rename = "taskType")]
    task_type: &'static str,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedder {
    async fn embed(&self, text: &str, task: EmbeddingTask) -> Result<Vec<f32>> {
        let url = format!(
            "{}/models/{}:embedContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let request = EmbedContentRequest {
            model: format!("models/{}", self.model),
            content: ContentBody {
                parts: vec![PartBody {
                    text: text.to_string(),
                }],
            },
            task_type: match task {
                EmbeddingTask::Query => "RETRIEVAL_QUERY",
                EmbeddingTask::Document => "RETRIEVAL_DOCUMENT",
            },
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::embedding(format!("HTTP {}: {}", status, body)));
        }

        let parsed: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("malformed embedding response: {}", e)))?;
        Ok(parsed.embedding.values)
    }

    fn dimensions(&self) -> usize {
        EMBEDDING_DIMENSIONS
    }

    fn name(&self) -> &str {
        "gemini-embedder"
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Gemini `generateContent` client.
///
/// Holds no API key; `complete` takes one per call so the rotation loop
/// above it can fail over between credentials.
pub struct GeminiCompletion {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiCompletion {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        })
    }

    /// List models available to `api_key` that support `generateContent`.
    pub async fn list_generation_models(&self, api_key: &str) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/models?key={}&pageSize=1000", self.base_url, api_key);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::llm(format!("HTTP {}: {}", status, body)));
        }

        let parsed: ListModelsResponse = response.json().await?;
        Ok(parsed
            .models
            .into_iter()
            .filter(|m| {
                m.supported_generation_methods
                    .iter()
                    .any(|method| method == "generateContent")
            })
            .collect())
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<ContentBody>,
}

#[derive(Serialize, Deserialize)]
struct ContentBody {
    parts: Vec<PartBody>,
}

#[derive(Serialize, Deserialize)]
struct PartBody {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentBody>,
}

/// One entry from the `models` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(rename = "supportedGenerationMethods", default)]
    pub supported_generation_methods: Vec<String>,
}

/// Pull the completion text out of a parsed response: first candidate,
/// all parts joined, trimmed. `None` when there is no usable text.
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text = content
        .parts
        .into_iter()
        .map(|part| part.text)
        .collect::<Vec<_>>()
        .join("");
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[derive(Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[async_trait]
impl CompletionBackend for GeminiCompletion {
    async fn complete(&self, prompt: &str, api_key: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );
        let request = GenerateContentRequest {
            contents: vec![ContentBody {
                parts: vec![PartBody {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(Error::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::llm(format!("HTTP {}: {}", status, body)));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("malformed completion response: {}", e)))?;

        extract_text(parsed).ok_or_else(|| Error::llm("completion contained no text"))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_trimmed_text_from_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "  I drafted it.  "}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).as_deref(), Some("I drafted it."));
    }

    #[test]
    fn joins_multiple_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "Liberty, "}, {"text": "equality, fraternity."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(
            extract_text(response).as_deref(),
            Some("Liberty, equality, fraternity.")
        );
    }

    #[test]
    fn empty_or_missing_candidates_yield_none() {
        let empty: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(extract_text(empty).is_none());

        let blank: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "   "}]}}]}"#,
        )
        .unwrap();
        assert!(extract_text(blank).is_none());
    }

    #[test]
    fn model_listing_filters_on_generate_content() {
        let parsed: ListModelsResponse = serde_json::from_str(
            r#"{"models": [
                {"name": "models/gemini-flash-latest",
                 "supportedGenerationMethods": ["generateContent", "countTokens"]},
                {"name": "models/embedding-001",
                 "supportedGenerationMethods": ["embedContent"]}
            ]}"#,
        )
        .unwrap();
        let generation: Vec<_> = parsed
            .models
            .into_iter()
            .filter(|m| {
                m.supported_generation_methods
                    .iter()
                    .any(|method| method == "generateContent")
            })
            .collect();
        assert_eq!(generation.len(), 1);
        assert_eq!(generation[0].name, "models/gemini-flash-latest");
    }
}
