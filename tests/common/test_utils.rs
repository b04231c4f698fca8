use super::mocks::MockLlmClient;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use std::sync::Arc;
use tempfile::TempDir;
use voice_agent_api::{
    config::{Config, LlmConfig, LogsConfig, ServerConfig},
    server::{self, handlers::AppState},
};

/// Create a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 5,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
        },
        llm: LlmConfig {
            api_key: "test-api-key".to_string(),
            model: "gpt-4".to_string(),
            ..LlmConfig::default()
        },
    }
}

/// Router backed by `client`, plus a handle to inspect what it received.
pub fn create_test_app_with(client: MockLlmClient, config: &Config) -> (Router, Arc<MockLlmClient>) {
    let client = Arc::new(client);
    let state = AppState::with_client(client.clone(), config);
    (server::router(state), client)
}

pub fn create_test_app(client: MockLlmClient) -> (Router, Arc<MockLlmClient>) {
    create_test_app_with(client, &create_test_config())
}

pub fn post_query(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/query")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Writes `content` as a YAML config file inside a fresh temp dir.
pub fn write_config_file(content: &str) -> (TempDir, String) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, content).expect("Failed to write config file");
    let path = path.to_string_lossy().to_string();
    (dir, path)
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 9090
  request_timeout_secs: 15
  logs:
    level: "debug"

llm:
  provider: "openai"
  base_url: "http://localhost:11434/v1"
  api_key: "file-api-key"
  model: "gpt-4o-mini"
  system_prompt: "You are a voice assistant. Keep answers short."
  temperature: 0.2
  max_tokens: 256
  empty_completion: "error"
"#;

/// Configuration without credentials, to be completed from the environment
pub const PARTIAL_CONFIG_YAML: &str = r#"
server:
  port: 7070
llm:
  model: "gpt-3.5-turbo"
"#;

pub const INVALID_CONFIG_YAML: &str = r#"
server:
  port: "not-a-number"
"#;
