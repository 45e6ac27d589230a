//! OpenAI-compatible chat-completion client
//!
//! One client serves both the regular chat model and the guard model. The
//! endpoint is configurable; the default points at Groq, which speaks the
//! OpenAI wire format.

use crate::config::LlmConfig;
use crate::error::{MemoirError, Result};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequestArgs,
};
use async_openai::{Client, config::OpenAIConfig};

/// Client for the hosted chat-completion API
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model: String,
    guard_model: String,
    seed: Option<i64>,
}

impl LlmClient {
    /// Create a client from configuration; the API key is read from the
    /// configured environment variable.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config.api_key()?;

        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&config.api_base);

        Ok(Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
            guard_model: config.guard_model.clone(),
            seed: config.seed,
        })
    }

    /// Run a system+user chat completion and return the first choice's text
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let messages = vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(system.to_string()),
                name: None,
            }),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(user.to_string()),
                name: None,
            }),
        ];

        let mut request = CreateChatCompletionRequestArgs::default();
        request.model(&self.model).messages(messages);
        if let Some(seed) = self.seed {
            request.seed(seed);
        }
        let request = request.build()?;

        let response = self.client.chat().create(request).await?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
            .ok_or_else(|| {
                log::error!("No content in chat response: {:?}", response);
                MemoirError::Llm("No content in response".to_string())
            })?;

        Ok(content.clone())
    }

    /// Run the guard model over a raw user message and return its verdict
    /// text. Deterministic settings: temperature 0, top_p 1.
    pub async fn classify(&self, user: &str) -> Result<String> {
        let messages = vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(user.to_string()),
                name: None,
            },
        )];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.guard_model)
            .messages(messages)
            .temperature(0.0)
            .max_tokens(1024u16)
            .top_p(1.0)
            .build()?;

        let response = self.client.chat().create(request).await?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
            .ok_or_else(|| {
                log::error!("No content in guard response: {:?}", response);
                MemoirError::Llm("No content in guard response".to_string())
            })?;

        Ok(content.clone())
    }
}
