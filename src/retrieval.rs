//! Document retrieval collaborator interface
//!
//! The retrieval and reranking subsystem lives outside this crate; this
//! module defines the contract it satisfies and a thin HTTP adapter to it.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Errors returned by the retrieval collaborator
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Error during network communication
    #[error("Network error: {0}")]
    Network(String),
    /// Response could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A document returned by the retrieval collaborator
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievedDocument {
    /// Source file name
    pub source: String,
    /// Page number, present only for paginated sources (PDF)
    pub page: Option<u32>,
    /// Full text of the document chunk
    pub content: String,
}

/// Interface to the external retrieval subsystem
///
/// Results are ordered by relevance ranking; the ordering is not guaranteed
/// stable across calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    /// Fetch documents relevant to the query, most relevant first
    ///
    /// # Errors
    ///
    /// Returns a `RetrievalError` when the collaborator cannot be reached or
    /// returns malformed data.
    async fn retrieve_documents(
        &self,
        query: &str,
    ) -> Result<Vec<RetrievedDocument>, RetrievalError>;
}

/// HTTP adapter to the retrieval service
pub struct HttpRetriever {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpRetriever {
    /// Create a new retriever pointing at the service base URL
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl DocumentRetriever for HttpRetriever {
    async fn retrieve_documents(
        &self,
        query: &str,
    ) -> Result<Vec<RetrievedDocument>, RetrievalError> {
        let url = format!("{}/retrieve", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .map_err(|e| RetrievalError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Network(format!(
                "Retrieval service error: {status} - {error_text}"
            )));
        }

        response
            .json::<Vec<RetrievedDocument>>()
            .await
            .map_err(|e| RetrievalError::InvalidResponse(e.to_string()))
    }
}
