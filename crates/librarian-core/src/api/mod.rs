//! HTTP client for the librarian backend.
//!
//! One `ApiClient` per process, shared behind an `Arc`. It owns the base URL,
//! the reqwest client and the token store; everything else (conversation
//! handle, transcript) belongs to the caller.

mod auth;
mod chat;

pub use auth::{RegisterRequest, TokenGrant};
pub use chat::{ChatOutgoing, ChatReply};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::store::TokenStore;

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The stored bearer token. Failing here means the call is not even
    /// attempted; the caller treats it as "not authenticated".
    fn bearer(&self) -> ApiResult<String> {
        match self.tokens.get() {
            Ok(Some(token)) => Ok(token),
            Ok(None) => Err(ApiError::NotAuthenticated),
            Err(e) => Err(ApiError::Storage(e.to_string())),
        }
    }

    /// Decode a response body, surfacing the backend's `detail` message on
    /// non-success statuses.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail)
                .and_then(detail_text);
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(response.json().await?)
    }
}

/// FastAPI-style error body. `detail` is usually a string but can be a
/// structured value for validation errors.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

fn detail_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
