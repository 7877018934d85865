//! Error types and JSON error responses

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tankobon_storage::StorageError;
use thiserror::Error;

/// Allowed request headers advertised to browsers
pub const CORS_ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Add the permissive CORS headers every response carries
pub fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
    response
}

/// JSON body with CORS headers
pub fn json_response(status: StatusCode, body: serde_json::Value) -> Response {
    with_cors((status, Json(body)).into_response())
}

/// Upload API error type
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, invalid, expired or non-admin token
    #[error("Unauthorized")]
    Unauthorized,

    /// Zone, key or CDN hostname missing from the deployment
    #[error("Storage not configured properly")]
    NotConfigured,

    /// Upload without file or path
    #[error("File and path are required")]
    MissingFields,

    /// `action` field other than upload/delete
    #[error("Unsupported action: {0}")]
    UnsupportedAction(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Too many requests")]
    RateLimited,

    /// Storage layer failure; the message is the gateway diagnostic
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// Body could not be read as multipart form data (413 when over the body limit)
    #[error("{0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MissingFields | Self::UnsupportedAction(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Multipart(e) => e.status(),
            Self::NotConfigured | Self::Storage(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = %status.as_u16(), "Upload error: {}", self);
        }

        json_response(status, json!({ "error": self.to_string() }))
    }
}
