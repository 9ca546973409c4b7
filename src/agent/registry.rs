//! Tool Registry - manages all tool providers
//!
//! Collects tools from all registered providers, routes tool calls, and
//! applies each tool's failure policy at the invocation boundary.

use super::provider::{FailurePolicy, ToolProvider};
use crate::llm::ToolDefinition;
use anyhow::{anyhow, Result};
use tracing::{debug, error, info, warn};

/// Registry that manages multiple tool providers
pub struct ToolRegistry {
    providers: Vec<Box<dyn ToolProvider>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    #[must_use]
    pub const fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Register a new tool provider
    pub fn register(&mut self, provider: Box<dyn ToolProvider>) {
        info!(provider = provider.name(), "Registered tool provider");
        self.providers.push(provider);
    }

    /// Get all tools from all registered providers
    #[must_use]
    pub fn all_tools(&self) -> Vec<ToolDefinition> {
        self.providers.iter().flat_map(|p| p.tools()).collect()
    }

    /// Find a provider and execute the tool.
    ///
    /// A failing `FailSoft` tool is logged with its full error chain and
    /// replaced with the tool's fallback output, so the agent's reasoning
    /// loop always receives a parseable result. A failing `FailLoud` tool is
    /// logged and propagated.
    ///
    /// # Errors
    ///
    /// Returns an error if no provider can handle the tool, or if a
    /// `FailLoud` tool fails.
    pub async fn execute(&self, tool_name: &str, arguments: &str) -> Result<String> {
        debug!(tool = tool_name, "Looking for provider to handle tool");

        for provider in &self.providers {
            if provider.can_handle(tool_name) {
                debug!(
                    tool = tool_name,
                    provider = provider.name(),
                    "Found provider for tool"
                );
                return match provider.execute(tool_name, arguments).await {
                    Ok(output) => Ok(output),
                    Err(e) => match provider.failure_policy(tool_name) {
                        FailurePolicy::FailSoft => {
                            error!(
                                tool = tool_name,
                                provider = provider.name(),
                                error = ?e,
                                "Tool failed, degrading to fallback output"
                            );
                            Ok(provider.fallback_output(tool_name))
                        }
                        FailurePolicy::FailLoud => {
                            error!(
                                tool = tool_name,
                                provider = provider.name(),
                                error = ?e,
                                "Tool failed"
                            );
                            Err(e)
                        }
                    },
                };
            }
        }

        warn!(tool = tool_name, "No provider found for tool");
        Err(anyhow!("Unknown tool: {tool_name}"))
    }

    /// Check if any provider can handle the tool
    #[must_use]
    pub fn can_handle(&self, tool_name: &str) -> bool {
        self.providers.iter().any(|p| p.can_handle(tool_name))
    }

    /// Get provider names
    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
