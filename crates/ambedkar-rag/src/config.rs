//! Configuration for the question-answering service
//!
//! All settings are read once at process start from the environment (with a
//! `.env` file loaded by the binaries). There is no hot reload.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Gemini (embedding + generation) configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Qdrant vector index configuration
    #[serde(default)]
    pub qdrant: QdrantConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Speech synthesis configuration
    #[serde(default)]
    pub speech: SpeechConfig,
}

impl RagConfig {
    /// Build the configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(keys) = std::env::var("GEMINI_API_KEY") {
            config.gemini.api_keys = parse_api_keys(&keys);
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.gemini.model = model;
        }
        if let Ok(policy) = std::env::var("RATE_LIMIT_POLICY") {
            match policy.parse() {
                Ok(policy) => config.gemini.rate_limit_policy = policy,
                Err(()) => tracing::warn!(
                    value = %policy,
                    "Unrecognized RATE_LIMIT_POLICY, keeping default"
                ),
            }
        }
        if let Ok(url) = std::env::var("QDRANT_URL") {
            config.qdrant.url = url;
        }
        if let Ok(key) = std::env::var("QDRANT_API_KEY") {
            if !key.is_empty() {
                config.qdrant.api_key = Some(key);
            }
        }
        if let Ok(collection) = std::env::var("QDRANT_COLLECTION") {
            config.qdrant.collection = collection;
        }
        if let Ok(strategy) = std::env::var("RETRIEVAL_STRATEGY") {
            match strategy.parse() {
                Ok(strategy) => config.retrieval.strategy = strategy,
                Err(()) => tracing::warn!(
                    value = %strategy,
                    "Unrecognized RETRIEVAL_STRATEGY, keeping default"
                ),
            }
        }
        if let Ok(path) = std::env::var("CORPUS_PATH") {
            config.retrieval.corpus_path = PathBuf::from(path);
        }
        if let Ok(host) = std::env::var("HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                config.server.port = port;
            }
        }
        if let Ok(dir) = std::env::var("AUDIO_DIR") {
            config.speech.audio_dir = PathBuf::from(dir);
        }

        config
    }
}

/// Split a `GEMINI_API_KEY` value into an ordered credential list.
///
/// A comma-separated value configures rotation; order is preserved and
/// empty entries are dropped.
pub fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number (`PORT` is honored for hosted deployments)
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
        }
    }
}

/// Gemini API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Ordered API keys, tried first to last on failure
    #[serde(default)]
    pub api_keys: Vec<String>,
    /// Generation model name
    #[serde(default = "default_generation_model")]
    pub model: String,
    /// Embedding model name (768 dimensions)
    #[serde(default = "default_embedding_model")]
    pub embed_model: String,
    /// API base URL
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// What to do with a credential that gets rate-limited
    #[serde(default)]
    pub rate_limit_policy: RateLimitPolicy,
    /// Backoff before retrying a rate-limited credential, in seconds
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            model: default_generation_model(),
            embed_model: default_embedding_model(),
            base_url: default_gemini_base_url(),
            timeout_secs: default_timeout_secs(),
            rate_limit_policy: RateLimitPolicy::default(),
            backoff_secs: default_backoff_secs(),
        }
    }
}

fn default_generation_model() -> String {
    "gemini-flash-latest".to_string()
}

fn default_embedding_model() -> String {
    "embedding-001".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_backoff_secs() -> u64 {
    2
}

/// Rotation behavior when a credential is rate-limited (HTTP 429).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RateLimitPolicy {
    /// Wait out the backoff and retry the same credential exactly once
    /// before advancing.
    #[default]
    SameCredential,
    /// Advance to the next credential immediately.
    NextCredential,
}

impl std::str::FromStr for RateLimitPolicy {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "same-credential" => Ok(Self::SameCredential),
            "next-credential" => Ok(Self::NextCredential),
            _ => Err(()),
        }
    }
}

/// Qdrant vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    /// Qdrant base URL
    pub url: String,
    /// Optional API key sent in the `api-key` header
    #[serde(default)]
    pub api_key: Option<String>,
    /// Collection name
    pub collection: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6333".to_string(),
            api_key: None,
            collection: "ambedkar_rag".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Which retrieval strategy to run
    #[serde(default)]
    pub strategy: RetrievalStrategy,
    /// How many chunks to retrieve per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Guardrail: refuse when the best cosine distance exceeds this
    #[serde(default = "default_guardrail_threshold")]
    pub guardrail_threshold: f32,
    /// JSON corpus file (lexical strategy and offline ingestion)
    #[serde(default = "default_corpus_path")]
    pub corpus_path: PathBuf,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            strategy: RetrievalStrategy::default(),
            top_k: default_top_k(),
            guardrail_threshold: default_guardrail_threshold(),
            corpus_path: default_corpus_path(),
        }
    }
}

fn default_top_k() -> usize {
    3
}

fn default_guardrail_threshold() -> f32 {
    1.4
}

fn default_corpus_path() -> PathBuf {
    PathBuf::from("prepared_chunks.json")
}

/// Retrieval strategy selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalStrategy {
    /// Embedding similarity search against the Qdrant collection
    #[default]
    Dense,
    /// Term-frequency ranking over the local corpus file
    Lexical,
}

impl std::str::FromStr for RetrievalStrategy {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "dense" => Ok(Self::Dense),
            "lexical" => Ok(Self::Lexical),
            _ => Err(()),
        }
    }
}

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Whether spoken answers are generated at all
    #[serde(default = "default_speech_enabled")]
    pub enabled: bool,
    /// Directory where MP3 files are written
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,
    /// BCP-47 language tag for synthesis
    #[serde(default = "default_speech_lang")]
    pub lang: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: default_speech_enabled(),
            audio_dir: default_audio_dir(),
            lang: default_speech_lang(),
        }
    }
}

fn default_speech_enabled() -> bool {
    true
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("audio")
}

fn default_speech_lang() -> String {
    "en".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_key_parses_to_one_credential() {
        assert_eq!(parse_api_keys("abc123"), vec!["abc123".to_string()]);
    }

    #[test]
    fn comma_separated_keys_preserve_order() {
        assert_eq!(
            parse_api_keys("key-a, key-b,key-c"),
            vec!["key-a".to_string(), "key-b".to_string(), "key-c".to_string()]
        );
    }

    #[test]
    fn empty_entries_are_dropped() {
        assert_eq!(parse_api_keys(",, ,"), Vec::<String>::new());
        assert_eq!(parse_api_keys("key-a,,key-b"), vec!["key-a", "key-b"]);
    }

    #[test]
    fn rate_limit_policy_round_trips_kebab_case() {
        let policy: RateLimitPolicy = serde_json::from_str("\"next-credential\"").unwrap();
        assert_eq!(policy, RateLimitPolicy::NextCredential);
        assert_eq!(
            serde_json::to_string(&RateLimitPolicy::SameCredential).unwrap(),
            "\"same-credential\""
        );
    }

    #[test]
    fn defaults_match_observed_deployment() {
        let config = RagConfig::default();
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.retrieval.guardrail_threshold, 1.4);
        assert_eq!(config.gemini.timeout_secs, 10);
        assert_eq!(config.qdrant.collection, "ambedkar_rag");
        assert_eq!(config.gemini.rate_limit_policy, RateLimitPolicy::SameCredential);
    }
}
