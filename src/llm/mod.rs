//! LLM completion client
//!
//! Provides a unified interface to the OpenAI-compatible completion endpoint
//! and the tool definitions exposed to the model.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::{Settings, COMPLETION_MAX_TOKENS, COMPLETION_TEMPERATURE};

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    /// Error returned by the provider's API
    #[error("API error: {0}")]
    ApiError(String),
    /// Any other unexpected error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// A message in an LLM conversation
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Message {
    /// Role of the message sender (user, assistant, system)
    pub role: String,
    /// Text content of the message
    pub content: String,
}

impl Message {
    /// Create a new user message
    #[must_use]
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }

    /// Create a new assistant message
    #[must_use]
    pub fn assistant(content: &str) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.to_string(),
        }
    }

    /// Create a new system message
    #[must_use]
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }
}

/// Tool definition for LLM function calling
///
/// Registered under a stable name with a natural-language description the
/// model uses to decide when to invoke the tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    /// Name of the tool
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// JSON schema for tool parameters
    pub parameters: serde_json::Value,
}

/// Interface for completion providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a chat completion
    async fn chat_completion(
        &self,
        system_prompt: &str,
        history: &[Message],
        user_message: &str,
        model_id: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError>;
}

/// Completion provider for OpenAI-compatible endpoints (`OpenRouter` et al.)
pub struct OpenAiCompatProvider {
    client: Client<OpenAIConfig>,
}

impl OpenAiCompatProvider {
    /// Create a provider for the given API key and endpoint base URL
    #[must_use]
    pub fn new(api_key: &str, base_url: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Client::with_config(config),
        }
    }
}

/// Build the ordered message list for an OpenAI-compatible request
fn build_messages(
    system_prompt: &str,
    history: &[Message],
    user_message: &str,
) -> Result<Vec<ChatCompletionRequestMessage>, LlmError> {
    let mut messages = vec![ChatCompletionRequestSystemMessageArgs::default()
        .content(system_prompt)
        .build()
        .map_err(|e| LlmError::Unknown(e.to_string()))?
        .into()];

    for msg in history {
        let m = match msg.role.as_str() {
            "user" => ChatCompletionRequestUserMessageArgs::default()
                .content(msg.content.clone())
                .build()
                .map_err(|e| LlmError::Unknown(e.to_string()))?
                .into(),
            _ => ChatCompletionRequestAssistantMessageArgs::default()
                .content(msg.content.clone())
                .build()
                .map_err(|e| LlmError::Unknown(e.to_string()))?
                .into(),
        };
        messages.push(m);
    }

    messages.push(
        ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| LlmError::Unknown(e.to_string()))?
            .into(),
    );

    Ok(messages)
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiCompatProvider {
    async fn chat_completion(
        &self,
        system_prompt: &str,
        history: &[Message],
        user_message: &str,
        model_id: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let messages = build_messages(system_prompt, history, user_message)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(model_id)
            .messages(messages)
            .max_tokens(max_tokens)
            .temperature(COMPLETION_TEMPERATURE)
            .build()
            .map_err(|e| LlmError::Unknown(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::ApiError(e.to_string()))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| LlmError::ApiError("Empty response".to_string()))
    }
}

/// Client facade over the configured completion provider
pub struct LlmClient {
    provider: Box<dyn LlmProvider>,
    model: String,
    system_prompt: String,
}

impl LlmClient {
    /// Create a client from application settings
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self::from_provider(
            Box::new(OpenAiCompatProvider::new(
                &settings.openai_api_key,
                &settings.openai_base_url,
            )),
            settings.model.clone(),
            settings.system_prompt.clone(),
        )
    }

    /// Create a client over an arbitrary provider
    #[must_use]
    pub fn from_provider(
        provider: Box<dyn LlmProvider>,
        model: String,
        system_prompt: String,
    ) -> Self {
        Self {
            provider,
            model,
            system_prompt,
        }
    }

    /// Request a completion for the conversation so far.
    ///
    /// Upstream failures are logged with full context and propagated; no
    /// retry is attempted here, the caller decides whether to retry or abort.
    ///
    /// # Errors
    ///
    /// Returns an `LlmError` when the upstream call fails.
    pub async fn complete(
        &self,
        history: &[Message],
        user_message: &str,
    ) -> Result<String, LlmError> {
        debug!(model = %self.model, history_len = history.len(), "Requesting completion");

        match self
            .provider
            .chat_completion(
                &self.system_prompt,
                history,
                user_message,
                &self.model,
                COMPLETION_MAX_TOKENS,
            )
            .await
        {
            Ok(text) => Ok(text),
            Err(e) => {
                error!(model = %self.model, error = %e, "LLM completion failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with(mock: MockLlmProvider) -> LlmClient {
        LlmClient::from_provider(
            Box::new(mock),
            "test-model".to_string(),
            "Ты дружелюбный банковский ассистент.".to_string(),
        )
    }

    #[tokio::test]
    async fn test_complete_passes_configured_parameters() {
        let mut mock = MockLlmProvider::new();
        mock.expect_chat_completion()
            .withf(|system_prompt, history, user_message, model_id, max_tokens| {
                system_prompt == "Ты дружелюбный банковский ассистент."
                    && history.len() == 2
                    && user_message == "Какие условия по вкладам?"
                    && model_id == "test-model"
                    && *max_tokens == 800
            })
            .returning(|_, _, _, _, _| Ok("Ответ ассистента".to_string()));

        let client = client_with(mock);
        let history = vec![Message::user("Привет"), Message::assistant("Здравствуйте!")];
        let answer = client
            .complete(&history, "Какие условия по вкладам?")
            .await
            .expect("completion should succeed");
        assert_eq!(answer, "Ответ ассистента");
    }

    #[tokio::test]
    async fn test_complete_propagates_upstream_error() {
        let mut mock = MockLlmProvider::new();
        mock.expect_chat_completion()
            .returning(|_, _, _, _, _| Err(LlmError::ApiError("502 Bad Gateway".to_string())));

        let client = client_with(mock);
        let err = client
            .complete(&[], "Привет")
            .await
            .expect_err("upstream error must propagate");
        assert!(matches!(err, LlmError::ApiError(_)));
    }
}
