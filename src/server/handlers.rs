use super::types::{QueryResult, decode_query};
use crate::llm::CompletionService;
use axum::{body::Bytes, extract::State, http::StatusCode, response::Json};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

pub const ROOT_MESSAGE: &str = "LLM Voice Agent API is running!\n";

#[derive(Clone)]
pub struct AppState {
    pub completion: Arc<CompletionService>,
}

pub async fn root() -> &'static str {
    ROOT_MESSAGE
}

/// Relays `{"message": ...}` to the model and answers `{"response": ...}`.
///
/// Errors are plain text: 400 for a bad body, 500 when the provider call
/// fails or times out.
pub async fn query(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<QueryResult>, (StatusCode, String)> {
    let request_id = Uuid::new_v4();

    let input = decode_query(&body).map_err(|e| {
        warn!(%request_id, "Rejected query: {}", e);
        (StatusCode::BAD_REQUEST, format!("{}\n", e))
    })?;

    info!(
        %request_id,
        model = state.completion.model(),
        message_len = input.message.len(),
        "Received query"
    );

    match state.completion.complete(&input.message).await {
        Ok(response) => {
            info!(%request_id, response_len = response.len(), "Query answered");
            Ok(Json(QueryResult { response }))
        }
        Err(e) => {
            error!(%request_id, "Failed to get completion: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("error calling OpenAI model: {}\n", e),
            ))
        }
    }
}
