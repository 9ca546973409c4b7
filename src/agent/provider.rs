//! Tool Provider trait for extensible agent tools
//!
//! This trait provides a unified interface for all tool providers.
//! Implementations include `KnowledgeBaseProvider` and `CurrencyProvider`.

use crate::llm::ToolDefinition;
use anyhow::Result;
use async_trait::async_trait;

/// How the registry treats a failure of a given tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Swallow the error at the invocation boundary and hand the agent the
    /// tool's fallback output; the reasoning loop is never interrupted
    FailSoft,
    /// Propagate the error to whoever invoked the registry
    FailLoud,
}

/// Unified interface for tool providers
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;

    /// Returns the list of tools this provider offers
    fn tools(&self) -> Vec<ToolDefinition>;

    /// Check if this provider can handle the given tool
    fn can_handle(&self, tool_name: &str) -> bool;

    /// Failure policy for the given tool
    fn failure_policy(&self, tool_name: &str) -> FailurePolicy {
        let _ = tool_name;
        FailurePolicy::FailSoft
    }

    /// Output handed to the agent when a fail-soft tool fails.
    ///
    /// Must be a well-formed payload of the tool's success shape, so the
    /// agent always receives a parseable result.
    fn fallback_output(&self, tool_name: &str) -> String;

    /// Execute a tool and return the result
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing or execution fails; the registry
    /// applies the tool's failure policy to it.
    async fn execute(&self, tool_name: &str, arguments: &str) -> Result<String>;
}
