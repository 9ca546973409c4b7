//! Tool providers module
//!
//! Contains implementations of `ToolProvider` for different tool sources.

pub mod currency;
pub mod knowledge_base;

pub use currency::CurrencyProvider;
pub use knowledge_base::KnowledgeBaseProvider;
