use super::{ChatCompletionRequest, ChatMessage, LlmClient};
use crate::{
    Error, Result,
    config::{EmptyCompletionPolicy, LlmConfig},
};
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};

/// Text returned when the provider answers without any choices.
pub const NO_RESPONSE_PLACEHOLDER: &str = "(no response from the model)";

/// Single-turn completion on top of an [`LlmClient`].
///
/// Holds everything a query needs that is fixed at startup, so handlers never
/// look at the environment.
pub struct CompletionService {
    client: Arc<dyn LlmClient>,
    model: String,
    system_prompt: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    empty_completion: EmptyCompletionPolicy,
    timeout: Duration,
}

impl CompletionService {
    pub fn new(client: Arc<dyn LlmClient>, config: &LlmConfig, timeout: Duration) -> Self {
        Self {
            client,
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            empty_completion: config.empty_completion,
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `message` to the configured model once and returns the first
    /// choice's text.
    pub async fn complete(&self, message: &str) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(prompt) = &self.system_prompt {
            messages.push(ChatMessage::system(prompt.as_str()));
        }
        messages.push(ChatMessage::user(message));

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response =
            tokio::time::timeout(self.timeout, self.client.create_chat_completion(request))
                .await
                .map_err(|_| Error::Timeout {
                    after: self.timeout,
                })??;

        if let Some(usage) = &response.usage {
            debug!(
                completion_id = %response.id,
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Completion usage"
            );
        }

        match response.choices.into_iter().next() {
            Some(choice) => Ok(choice.content),
            None => match self.empty_completion {
                EmptyCompletionPolicy::Placeholder => {
                    warn!(
                        completion_id = %response.id,
                        "Provider returned no choices, answering with placeholder"
                    );
                    Ok(NO_RESPONSE_PLACEHOLDER.to_string())
                }
                EmptyCompletionPolicy::Error => {
                    Err(Error::llm("provider returned no completion choices"))
                }
            },
        }
    }
}
