// Client-side error types for talking to the yam backend
use thiserror::Error;

/// Errors surfaced by the API client and session layer.
///
/// The backend reports failures as `{"error": {"message": string | [string]}}`;
/// those arrive here as `Api` with the message list already normalized. Every
/// other variant is a local failure (transport, storage, token decode).
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response from the backend, with normalized messages.
    #[error("API error ({status}): {}", messages.join(", "))]
    Api { status: u16, messages: Vec<String> },

    /// Transport-level failure: connection refused, DNS, timeout.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The stored session token could not be decoded locally.
    #[error("malformed session token: {0}")]
    TokenDecode(#[from] jsonwebtoken::errors::Error),

    /// Reading or writing client-side storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// The configured backend base URL does not parse.
    #[error("invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    /// A request or response body failed to (de)serialize locally.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An operation that needs a signed-in user ran without one.
    #[error("no user logged in")]
    NotLoggedIn,

    /// A login or register round-trip finished without a usable session.
    #[error("session could not be established: {0}")]
    Session(String),

    /// Response body did not match the documented contract.
    #[error("unexpected response shape: {0}")]
    UnexpectedResponse(String),
}

impl ApiError {
    pub fn api(status: u16, messages: Vec<String>) -> Self {
        ApiError::Api { status, messages }
    }

    /// HTTP status of the failed request, when there was a response at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The list-of-strings form every failure collapses into for display.
    ///
    /// Form screens render these as inline error lines, one per entry.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ApiError::Api { messages, .. } if !messages.is_empty() => messages.clone(),
            other => vec![other.to_string()],
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
