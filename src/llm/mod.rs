mod client;
mod completion;
mod types;

pub use client::{LlmClient, OpenAiClient};
pub use completion::{CompletionService, NO_RESPONSE_PLACEHOLDER};
pub use types::*;
