//! Answer generation with credential rotation
//!
//! Credentials are tried strictly in order, one request each, and the
//! sequence is never restarted. The only in-place retry is the optional
//! single rate-limit retry under `RateLimitPolicy::SameCredential`.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{GeminiConfig, RateLimitPolicy};
use crate::error::{Error, Result};
use crate::providers::CompletionBackend;

/// Runs the completion backend across an ordered credential list.
pub struct AnswerGenerator {
    backend: Arc<dyn CompletionBackend>,
    credentials: Vec<String>,
    policy: RateLimitPolicy,
    backoff: Duration,
}

impl AnswerGenerator {
    pub fn new(backend: Arc<dyn CompletionBackend>, config: &GeminiConfig) -> Self {
        Self {
            backend,
            credentials: config.api_keys.clone(),
            policy: config.rate_limit_policy,
            backoff: Duration::from_secs(config.backoff_secs),
        }
    }

    /// Whether any credential is configured at all.
    pub fn has_credentials(&self) -> bool {
        !self.credentials.is_empty()
    }

    /// Generate a completion, failing over across credentials.
    ///
    /// Returns the first successful completion. After the last credential
    /// fails, returns the LAST observed error; earlier failures are logged
    /// but never surfaced.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let mut last_error = Error::config("no API credentials configured");

        for (slot, key) in self.credentials.iter().enumerate() {
            match self.backend.complete(prompt, key).await {
                Ok(text) => {
                    tracing::debug!(slot, model = self.backend.model(), "Completion succeeded");
                    return Ok(text);
                }
                Err(e) if e.is_rate_limited() && self.policy == RateLimitPolicy::SameCredential => {
                    tracing::warn!(
                        slot,
                        backoff_secs = self.backoff.as_secs(),
                        "Credential rate-limited, retrying it once after backoff"
                    );
                    tokio::time::sleep(self.backoff).await;
                    match self.backend.complete(prompt, key).await {
                        Ok(text) => return Ok(text),
                        Err(retry_err) => {
                            tracing::warn!(slot, error = %retry_err, "Retry failed, advancing");
                            last_error = retry_err;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(slot, error = %e, "Credential failed, advancing");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}
