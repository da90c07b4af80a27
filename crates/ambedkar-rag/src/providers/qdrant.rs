//! Qdrant REST adapter
//!
//! Covers the two call sites the system has: `points/query` at question time
//! and collection rebuild + upsert in the offline ingestion binary. The
//! collection uses the cosine metric, so Qdrant reports a SIMILARITY
//! (higher is better); `search` converts it to a cosine distance
//! (lower is better) before it becomes a `RetrievalResult` score.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use super::VectorIndex;
use crate::config::QdrantConfig;
use crate::error::{Error, Result};
use crate::types::{Chunk, RetrievalResult};

/// Cosine similarity in [-1, 1] to cosine distance in [0, 2].
pub fn similarity_to_distance(similarity: f32) -> f32 {
    1.0 - similarity
}

/// REST client for one Qdrant collection.
pub struct QdrantIndex {
    client: Client,
    base_url: String,
    collection: String,
    api_key: Option<String>,
}

impl QdrantIndex {
    pub fn new(config: &QdrantConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/collections/{}{}", self.base_url, self.collection, path);
        let mut builder = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            builder = builder.header("api-key", key);
        }
        builder
    }

    async fn check(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::vector_db(format!("{} failed: HTTP {}: {}", what, status, body)));
        }
        Ok(response)
    }

    /// Drop and recreate the collection with `dimensions`-wide cosine vectors.
    ///
    /// Ingestion-only; the serving pipeline never calls this.
    pub async fn recreate_collection(&self, dimensions: usize) -> Result<()> {
        // Delete is best-effort: a 404 on the first run is fine.
        let _ = self.request(reqwest::Method::DELETE, "").send().await;

        let body = json!({
            "vectors": { "size": dimensions, "distance": "Cosine" }
        });
        let response = self
            .request(reqwest::Method::PUT, "")
            .json(&body)
            .send()
            .await?;
        Self::check(response, "collection create").await?;
        tracing::info!(
            collection = %self.collection,
            dimensions,
            "Collection recreated"
        );
        Ok(())
    }

    /// Upsert chunks with positional integer IDs. Ingestion-only.
    pub async fn upsert(&self, chunks: &[Chunk], vectors: &[Vec<f32>]) -> Result<()> {
        if chunks.len() != vectors.len() {
            return Err(Error::vector_db(format!(
                "chunk/vector count mismatch: {} vs {}",
                chunks.len(),
                vectors.len()
            )));
        }

        let points: Vec<_> = chunks
            .iter()
            .zip(vectors)
            .enumerate()
            .map(|(id, (chunk, vector))| {
                json!({
                    "id": id,
                    "vector": vector,
                    "payload": chunk,
                })
            })
            .collect();

        let response = self
            .request(reqwest::Method::PUT, "/points?wait=true")
            .json(&json!({ "points": points }))
            .send()
            .await?;
        Self::check(response, "points upsert").await?;
        Ok(())
    }
}

#[derive(Serialize)]
struct QueryPointsRequest<'a> {
    query: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct QueryPointsResponse {
    result: QueryPointsResult,
}

#[derive(Deserialize)]
struct QueryPointsResult {
    #[serde(default)]
    points: Vec<ScoredPoint>,
}

#[derive(Deserialize)]
struct ScoredPoint {
    score: f32,
    payload: Option<Chunk>,
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievalResult>> {
        let request = QueryPointsRequest {
            query: vector,
            limit: top_k,
            with_payload: true,
        };
        let response = self
            .request(reqwest::Method::POST, "/points/query")
            .json(&request)
            .send()
            .await?;
        let response = Self::check(response, "points query").await?;

        let parsed: QueryPointsResponse = response
            .json()
            .await
            .map_err(|e| Error::vector_db(format!("malformed query response: {}", e)))?;

        Ok(parsed
            .result
            .points
            .into_iter()
            .filter_map(|point| {
                point
                    .payload
                    .map(|chunk| RetrievalResult::new(chunk, Some(similarity_to_distance(point.score))))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "qdrant"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_similarity_is_distance_zero() {
        assert_eq!(similarity_to_distance(1.0), 0.0);
    }

    #[test]
    fn opposite_vectors_are_distance_two() {
        assert_eq!(similarity_to_distance(-1.0), 2.0);
    }

    #[test]
    fn query_response_parses_payload_chunks() {
        let parsed: QueryPointsResponse = serde_json::from_str(
            r#"{"result": {"points": [
                {"id": 0, "score": 0.95,
                 "payload": {"text": "Ambedkar drafted the Constitution", "source": "speech1"}},
                {"id": 1, "score": 0.4, "payload": null}
            ]}}"#,
        )
        .unwrap();
        let results: Vec<_> = parsed
            .result
            .points
            .into_iter()
            .filter_map(|p| p.payload.map(|c| (c, p.score)))
            .collect();
        // The payload-less point is dropped rather than fabricated.
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.source.as_deref(), Some("speech1"));
    }
}
