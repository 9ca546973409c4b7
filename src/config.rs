//! Configuration and settings management
//!
//! Loads settings from environment variables and defines completion constants.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token
    pub telegram_token: String,

    /// API key for the completion provider (`OpenRouter` via the
    /// OpenAI-compatible API)
    pub openai_api_key: String,

    /// Base URL of the completion endpoint
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Model identifier passed to the completion endpoint
    #[serde(default = "default_model")]
    pub model: String,

    /// System prompt prepended to every conversation
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_openai_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "openai/gpt-3.5-turbo".to_string()
}

fn default_system_prompt() -> String {
    "Ты дружелюбный банковский ассистент.".to_string()
}

impl Settings {
    /// Create new settings by loading from environment and files.
    ///
    /// A missing required value (`TELEGRAM_TOKEN`, `OPENAI_API_KEY`) fails
    /// the load, so the process never starts partially configured.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails or a required value is absent.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(File::with_name("config/default").required(false))
            // Add in the current environment file
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked into git
            .add_source(File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of APP)
            .add_source(Environment::with_prefix("APP").separator("__"))
            // Also add settings from environment variables directly (without prefix)
            // Note: Environment::default() auto-converts UPPER_SNAKE_CASE to snake_case
            // ignore_empty treats empty env vars as unset
            .add_source(Environment::default().ignore_empty(true))
            .build()?;

        s.try_deserialize()
    }
}

// Completion configuration
/// Sampling temperature for chat completions
pub const COMPLETION_TEMPERATURE: f32 = 0.7;
/// Maximum output tokens per completion
pub const COMPLETION_MAX_TOKENS: u32 = 800;
