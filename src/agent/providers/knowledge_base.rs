//! Knowledge Base Provider - document search over the bank's product documents
//!
//! Provides the `document_search` tool backed by the external retrieval
//! collaborator (retrieval + reranking).

use crate::agent::provider::{FailurePolicy, ToolProvider};
use crate::llm::ToolDefinition;
use crate::retrieval::{DocumentRetriever, RetrievedDocument};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Empty success payload handed to the agent when retrieval fails or finds
/// nothing
const EMPTY_SOURCES: &str = "{\"sources\":[]}";

/// Provider for document search over the knowledge base
pub struct KnowledgeBaseProvider {
    retriever: Arc<dyn DocumentRetriever>,
}

impl KnowledgeBaseProvider {
    /// Create a new provider backed by the given retriever
    #[must_use]
    pub fn new(retriever: Arc<dyn DocumentRetriever>) -> Self {
        Self { retriever }
    }
}

/// Arguments for `document_search` tool
#[derive(Debug, Deserialize)]
struct DocumentSearchArgs {
    query: String,
}

/// One entry of the `sources` array handed back to the agent
#[derive(Debug, Serialize)]
struct SourceEntry<'a> {
    source: &'a str,
    page_content: &'a str,
    // Omitted entirely for sources without pagination, never null
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
}

#[derive(Debug, Serialize)]
struct SourcesPayload<'a> {
    sources: Vec<SourceEntry<'a>>,
}

/// Shape retrieved documents into the JSON payload the agent consumes
fn shape_sources(documents: &[RetrievedDocument]) -> Result<String> {
    let payload = SourcesPayload {
        sources: documents
            .iter()
            .map(|doc| SourceEntry {
                source: &doc.source,
                page_content: &doc.content,
                page: doc.page,
            })
            .collect(),
    };

    serde_json::to_string(&payload).context("serializing sources payload")
}

#[async_trait]
impl ToolProvider for KnowledgeBaseProvider {
    fn name(&self) -> &'static str {
        "knowledge_base"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![ToolDefinition {
            name: "document_search".to_string(),
            description: "Search the bank's product documents (loan terms, deposits and other banking products). Returns a JSON object with a list of sources; each source has the file name, the document text, and a page number for paginated documents.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    }
                },
                "required": ["query"]
            }),
        }]
    }

    fn can_handle(&self, tool_name: &str) -> bool {
        tool_name == "document_search"
    }

    fn failure_policy(&self, _tool_name: &str) -> FailurePolicy {
        FailurePolicy::FailSoft
    }

    fn fallback_output(&self, _tool_name: &str) -> String {
        EMPTY_SOURCES.to_string()
    }

    async fn execute(&self, tool_name: &str, arguments: &str) -> Result<String> {
        debug!(tool = tool_name, "Executing knowledge base tool");

        match tool_name {
            "document_search" => {
                let args: DocumentSearchArgs = serde_json::from_str(arguments)?;
                debug!(query = %args.query, "Document search");

                let documents = self
                    .retriever
                    .retrieve_documents(&args.query)
                    .await
                    .context("retrieving documents")?;

                shape_sources(&documents)
            }
            _ => anyhow::bail!("Unknown knowledge base tool: {tool_name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::MockDocumentRetriever;
    use serde_json::Value;

    fn doc(source: &str, page: Option<u32>, content: &str) -> RetrievedDocument {
        RetrievedDocument {
            source: source.to_string(),
            page,
            content: content.to_string(),
        }
    }

    fn provider_with_docs(docs: Vec<RetrievedDocument>) -> KnowledgeBaseProvider {
        let mut mock = MockDocumentRetriever::new();
        mock.expect_retrieve_documents()
            .returning(move |_| Ok(docs.clone()));
        KnowledgeBaseProvider::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_empty_retrieval_yields_empty_sources() {
        let provider = provider_with_docs(vec![]);
        let output = provider
            .execute("document_search", "{\"query\": \"вклады\"}")
            .await
            .expect("search should succeed");
        assert_eq!(output, "{\"sources\":[]}");
    }

    #[tokio::test]
    async fn test_page_key_omitted_when_absent() {
        let provider = provider_with_docs(vec![
            doc("credit_terms.pdf", Some(3), "Условия кредита"),
            doc("deposits.json", None, "Условия вклада"),
        ]);
        let output = provider
            .execute("document_search", "{\"query\": \"условия\"}")
            .await
            .expect("search should succeed");

        let value: Value = serde_json::from_str(&output).expect("output must be valid JSON");
        let sources = value["sources"].as_array().expect("sources must be an array");
        assert_eq!(sources.len(), 2);

        assert_eq!(sources[0]["source"], "credit_terms.pdf");
        assert_eq!(sources[0]["page"], 3);
        assert_eq!(sources[0]["page_content"], "Условия кредита");

        assert_eq!(sources[1]["source"], "deposits.json");
        assert!(
            sources[1].get("page").is_none(),
            "page key must be absent, not null"
        );
    }

    #[tokio::test]
    async fn test_cyrillic_preserved_verbatim() {
        let provider = provider_with_docs(vec![doc(
            "deposits.json",
            None,
            "Ставка по вкладу — 18% годовых",
        )]);
        let output = provider
            .execute("document_search", "{\"query\": \"ставка\"}")
            .await
            .expect("search should succeed");
        assert!(output.contains("Ставка по вкладу — 18% годовых"));
        assert!(!output.contains("\\u"));
    }

    #[tokio::test]
    async fn test_deterministic_output_for_same_documents() {
        let docs = vec![
            doc("a.pdf", Some(1), "первый"),
            doc("b.pdf", Some(2), "второй"),
        ];
        let provider = provider_with_docs(docs);
        let first = provider
            .execute("document_search", "{\"query\": \"q\"}")
            .await
            .expect("search should succeed");
        let second = provider
            .execute("document_search", "{\"query\": \"q\"}")
            .await
            .expect("search should succeed");
        assert_eq!(first, second);
    }

    #[test]
    fn test_fallback_matches_empty_success_shape() {
        let mock = MockDocumentRetriever::new();
        let provider = KnowledgeBaseProvider::new(Arc::new(mock));
        assert_eq!(
            provider.fallback_output("document_search"),
            "{\"sources\":[]}"
        );
        assert_eq!(
            provider.failure_policy("document_search"),
            FailurePolicy::FailSoft
        );
    }
}
