use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::models::UserProfile;

/// Registration payload, forwarded to the backend verbatim. The client does
/// no local validation; the backend owns the rules.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl ApiClient {
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<UserProfile> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// On success the returned token is persisted before the grant is handed
    /// back; every subsequent authenticated call depends on that write.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<TokenGrant> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&body)
            .send()
            .await?;
        let grant: TokenGrant = Self::decode(response).await?;
        self.tokens
            .set(&grant.access_token)
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        Ok(grant)
    }

    /// The sole source of truth for session validity. Token presence alone
    /// proves nothing; only this call does.
    pub async fn me(&self) -> ApiResult<UserProfile> {
        let token = self.bearer()?;
        let response = self
            .http
            .get(self.url("/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Purely local: deletes the persisted token without a backend call. The
    /// next `me()` then fails and the session resolves anonymous.
    pub fn logout(&self) -> ApiResult<()> {
        self.tokens
            .delete()
            .map_err(|e| ApiError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryTokenStore, TokenStore};
    use std::sync::Arc;

    #[test]
    fn register_request_omits_absent_fields() {
        let request = RegisterRequest {
            email: "reader@example.com".to_string(),
            name: None,
            password: "pw".to_string(),
            role: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["email"], "reader@example.com");
        assert!(json.get("name").is_none());
        assert!(json.get("role").is_none());
    }

    #[tokio::test]
    async fn me_without_token_fails_locally() {
        let tokens = Arc::new(MemoryTokenStore::new());
        let client = ApiClient::new("http://localhost:1", tokens);
        match client.me().await {
            Err(ApiError::NotAuthenticated) => {}
            other => panic!("expected NotAuthenticated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn logout_deletes_the_stored_token() {
        let tokens = Arc::new(MemoryTokenStore::with_token("tok"));
        let client = ApiClient::new("http://localhost:1", tokens.clone());
        client.logout().unwrap();
        assert!(tokens.get().unwrap().is_none());
        // Logging out twice is fine
        client.logout().unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires a running backend
    async fn login_then_me_roundtrip() {
        let base = std::env::var("LIBRARIAN_API_BASE").expect("LIBRARIAN_API_BASE not set");
        let tokens = Arc::new(MemoryTokenStore::new());
        let client = ApiClient::new(base, tokens.clone());

        client.login("u@x.com", "pw").await.unwrap();
        assert!(tokens.get().unwrap().is_some());

        let profile = client.me().await.unwrap();
        assert_eq!(profile.email, "u@x.com");
    }
}
