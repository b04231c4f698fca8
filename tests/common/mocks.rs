use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use voice_agent_api::{
    Error, Result,
    llm::{ChatCompletionRequest, ChatCompletionResponse, Choice, LlmClient, Usage},
};

/// Mock LLM client for testing
#[derive(Debug)]
pub struct MockLlmClient {
    pub choices: Vec<String>,
    pub requests: Arc<Mutex<Vec<ChatCompletionRequest>>>,
    pub error: Option<String>,
    pub delay: Option<Duration>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            choices: Vec::new(),
            requests: Arc::new(Mutex::new(Vec::new())),
            error: None,
            delay: None,
        }
    }

    /// Answers every request with a single choice holding `content`.
    pub fn replying(content: &str) -> Self {
        Self::new().with_choices(vec![content.to_string()])
    }

    pub fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn get_requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(ref error) = self.error {
            return Err(Error::llm(error.clone()));
        }

        Ok(ChatCompletionResponse {
            id: "chatcmpl-mock".to_string(),
            model: request.model,
            choices: self
                .choices
                .iter()
                .enumerate()
                .map(|(index, content)| Choice {
                    index: index as u32,
                    content: content.clone(),
                    finish_reason: Some("Stop".to_string()),
                })
                .collect(),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
        })
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}
