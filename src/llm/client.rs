use super::types::*;
use crate::{Result, config::LlmConfig};
use async_openai::{Client, config::OpenAIConfig, types as openai_types};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Opaque seam in front of the completion provider.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse>;
}

pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
}

impl OpenAiClient {
    /// `timeout` bounds each HTTP exchange with the provider.
    pub fn new(config: &LlmConfig, timeout: Duration) -> Result<Self> {
        let mut openai_config = OpenAIConfig::new().with_api_key(config.api_key.clone());

        if !config.base_url.is_empty() {
            openai_config = openai_config.with_api_base(config.base_url.clone());
        }

        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(single_attempt());

        Ok(Self { client })
    }
}

/// async-openai retries 429 and 5xx answers by default; an exhausted elapsed
/// budget makes the first failure final.
fn single_attempt() -> backoff::ExponentialBackoff {
    backoff::ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        debug!(
            "Creating chat completion on {} with {} messages",
            request.model,
            request.messages.len()
        );

        let messages = request
            .messages
            .iter()
            .map(ChatMessage::to_openai_message)
            .collect::<Result<Vec<_>>>()?;

        let mut request_builder = openai_types::CreateChatCompletionRequestArgs::default();
        request_builder.model(&request.model).messages(messages);

        if let Some(temperature) = request.temperature {
            request_builder.temperature(temperature);
        }

        if let Some(max_tokens) = request.max_tokens {
            request_builder.max_completion_tokens(max_tokens);
        }

        let openai_request = request_builder.build()?;

        let response = self.client.chat().create(openai_request).await?;

        debug!(
            "Received chat completion response with {} choices",
            response.choices.len()
        );

        let choices = response
            .choices
            .into_iter()
            .map(|choice| Choice {
                index: choice.index,
                content: choice.message.content.unwrap_or_default(),
                finish_reason: choice.finish_reason.map(|fr| format!("{fr:?}")),
            })
            .collect();

        let usage = response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ChatCompletionResponse {
            id: response.id,
            model: response.model,
            choices,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::types::ChatCompletionRequestMessage;

    #[test]
    fn test_openai_client_creation() {
        let config = LlmConfig {
            api_key: "test-api-key".to_string(),
            ..LlmConfig::default()
        };

        assert!(OpenAiClient::new(&config, Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_openai_client_with_custom_base_url() {
        let config = LlmConfig {
            api_key: "test-api-key".to_string(),
            base_url: "https://custom.api.com/v1".to_string(),
            ..LlmConfig::default()
        };

        assert!(OpenAiClient::new(&config, Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_chat_message_to_openai_system() {
        let openai_msg = ChatMessage::system("You are a helpful assistant")
            .to_openai_message()
            .unwrap();

        assert!(matches!(
            openai_msg,
            ChatCompletionRequestMessage::System(_)
        ));
    }

    #[test]
    fn test_chat_message_to_openai_user() {
        let openai_msg = ChatMessage::user("Hello, how are you?")
            .to_openai_message()
            .unwrap();

        assert!(matches!(openai_msg, ChatCompletionRequestMessage::User(_)));
    }
}
