use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Body of `POST /query`, with a non-empty message.
#[derive(Debug)]
pub struct QueryInput {
    pub message: String,
}

// `null` and a missing field both land on the "required" path.
#[derive(Deserialize)]
struct RawQuery {
    #[serde(default, alias = "Message")]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QueryResult {
    pub response: String,
}

/// Decodes the first JSON value of a query body. Whatever follows it and the
/// declared content type are ignored.
pub fn decode_query(body: &[u8]) -> Result<QueryInput> {
    let raw = serde_json::Deserializer::from_slice(body)
        .into_iter::<RawQuery>()
        .next()
        .ok_or_else(|| Error::invalid_request("failed to decode JSON: EOF"))?
        .map_err(|e| Error::invalid_request(format!("failed to decode JSON: {}", e)))?;

    match raw.message {
        Some(message) if !message.is_empty() => Ok(QueryInput { message }),
        _ => Err(Error::invalid_request("the 'message' field is required")),
    }
}
