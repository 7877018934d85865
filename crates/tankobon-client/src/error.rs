//! Client error types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No access token configured
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Gateway returned an error status
    #[error("Upload gateway error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid response
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Build an API error from an error response body
    ///
    /// Uses the JSON `error` field when present, otherwise `fallback`.
    pub fn from_response_body(status: u16, body: &str, fallback: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string());

        Self::Api { status, message }
    }

    /// Check if the gateway rejected the token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::Api { status: 401, .. })
    }
}
