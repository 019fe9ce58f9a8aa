use thiserror::Error;

/// Shown when a failure carries no usable message of its own.
pub const FALLBACK_MESSAGE: &str = "Request failed";

/// Failure taxonomy for every backend interaction.
///
/// Client operations never translate or swallow these; the view layer is the
/// only place they are turned into user-visible text.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected locally, before any network traffic.
    #[error("message must not be empty")]
    EmptyMessage,

    /// No token is stored, so an authenticated call cannot even be attempted.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The backend answered with a non-success status. `detail` is the
    /// server-supplied message when the body carried one.
    #[error("server returned {}{}", .status, detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("storage error: {0}")]
    Storage(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(": {detail}"),
        None => String::new(),
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// The most specific text available for display: the server's detail
    /// message, else the transport error, else a fixed fallback.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => detail.clone(),
            ApiError::Status { .. } => FALLBACK_MESSAGE.to_string(),
            ApiError::Transport(err) => err.to_string(),
            other => other.to_string(),
        }
    }

    /// Whether this failure means "the session is invalid", as opposed to a
    /// failure of the operation itself.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ApiError::NotAuthenticated | ApiError::Status { status: 401, .. }
        )
    }
}
