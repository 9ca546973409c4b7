#![deny(missing_docs)]
//! Bank assistant core library.
//!
//! Shared logic for the agent tool layer (document search, currency
//! conversion), the LLM completion client, the retrieval collaborator
//! interface, and configuration.

/// Agent tool providers and registry.
pub mod agent;
/// Configuration management.
pub mod config;
/// LLM completion client.
pub mod llm;
/// Document retrieval collaborator interface.
pub mod retrieval;
