use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::ApiClient;
use crate::error::{ApiError, ApiResult};

/// One user turn bound for the chat endpoint. `conversation_id` is absent for
/// a brand-new conversation; `where_filter` is an opaque map of retrieval
/// constraints (genre, language, ...) passed straight through to the backend.
#[derive(Debug, Clone, Serialize)]
pub struct ChatOutgoing {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_filter: Option<Map<String, Value>>,
}

/// The backend's answer, returned unmodified. `title` and `reason` carry the
/// recommendation metadata when the reply contains one.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    #[serde(deserialize_with = "id_as_string")]
    pub conversation_id: String,
    pub answer: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// The server may hand the identifier back as a string (UUID) or a number;
/// the client treats both as an opaque string.
fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "conversation_id must be a string or number, got {other}"
        ))),
    }
}

impl ApiClient {
    /// Relay one chat turn. Empty input is rejected locally, before any
    /// network traffic or token lookup.
    pub async fn send_chat(&self, outgoing: &ChatOutgoing) -> ApiResult<ChatReply> {
        if outgoing.message.trim().is_empty() {
            return Err(ApiError::EmptyMessage);
        }
        let token = self.bearer()?;
        let response = self
            .http
            .post(self.url("/chat"))
            .bearer_auth(token)
            .json(outgoing)
            .send()
            .await?;
        Self::decode(response).await
    }
}
