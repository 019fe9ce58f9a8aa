use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Account record returned by the registration and identity endpoints.
///
/// Treated as opaque beyond field presence; the client never derives logic
/// from `role` or `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: String,
    /// Naive UTC timestamp as the backend emits it (no offset suffix).
    pub created_at: NaiveDateTime,
}

impl UserProfile {
    /// Name to greet the user with: display name when set, else the email.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}
