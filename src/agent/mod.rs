//! Agent tool layer
//!
//! This module provides the external-capability layer for the agent:
//! - Named tools the agent can invoke with structured arguments
//! - A registry that dispatches tool calls to providers
//! - An explicit failure policy applied at the invocation boundary

/// Tool provider trait and failure policy
pub mod provider;
/// Tool provider implementations
pub mod providers;
/// Tool registry and dispatch
pub mod registry;

pub use provider::{FailurePolicy, ToolProvider};
pub use registry::ToolRegistry;
