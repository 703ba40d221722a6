//! Retrieval service seam.
//!
//! The actual retrieval and generation pipeline lives outside this
//! backend; everything here talks to it through `RetrievalService` and the
//! raw result shape it returns.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::chat::record::AnswerMode;
use crate::core::errors::ApiError;

/// One retrieved passage with its source metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// Originating document path or URL.
    pub source: String,
    /// 0-based page index; absent for formats without pagination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    /// Passage text. Empty when the orchestrator omits it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
}

/// Raw response of the retrieval+generation pipeline.
///
/// `context` is ordered by descending relevance; index 0 is the best hit.
/// Both fields default so a partial response normalizes instead of
/// failing: a missing answer reads as empty, a missing context as no hits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RawRetrievalResult {
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub context: Vec<RetrievedPassage>,
}

/// Abstract retrieval backend.
#[async_trait]
pub trait RetrievalService: Send + Sync {
    /// Run one query in the given answer mode.
    async fn ask(&self, query: &str, mode: AnswerMode) -> Result<RawRetrievalResult, ApiError>;
}

/// Client for the HTTP retrieval orchestrator.
pub struct HttpRetrievalClient {
    endpoint: String,
    top_k: usize,
    client: reqwest::Client,
}

impl HttpRetrievalClient {
    pub fn new(
        endpoint: impl Into<String>,
        top_k: usize,
        timeout_secs: u64,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(ApiError::internal)?;

        Ok(Self {
            endpoint: endpoint.into(),
            top_k,
            client,
        })
    }
}

#[async_trait]
impl RetrievalService for HttpRetrievalClient {
    async fn ask(&self, query: &str, mode: AnswerMode) -> Result<RawRetrievalResult, ApiError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({
                "query": query,
                "mode": mode.as_str(),
                "top_k": self.top_k,
            }))
            .send()
            .await
            .map_err(|err| {
                tracing::warn!("Retrieval request failed: {}", err);
                ApiError::ServiceUnavailable
            })?;

        if !response.status().is_success() {
            tracing::warn!("Retrieval endpoint returned {}", response.status());
            return Err(ApiError::ServiceUnavailable);
        }

        response
            .json::<RawRetrievalResult>()
            .await
            .map_err(ApiError::internal)
    }
}
