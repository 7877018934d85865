//! Upload/delete function handler
//!
//! `POST` takes a multipart form with `file`, `path` and `action`
//! (`upload` by default, or `delete`). The bearer token is checked before the
//! body is read, and storage configuration is checked before any provider call.

use crate::auth::verify_admin_token;
use crate::error::{json_response, with_cors};
use crate::{ApiError, AppState};
use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use tankobon_storage::{build_host_candidates, normalize_object_path};
use tracing::{info, warn};

/// Fallback content type for file parts without one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// What the form asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadAction {
    #[default]
    Upload,
    Delete,
}

impl FromStr for UploadAction {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "upload" => Ok(Self::Upload),
            "delete" => Ok(Self::Delete),
            other => Err(ApiError::UnsupportedAction(other.to_string())),
        }
    }
}

/// File part of the form
#[derive(Debug, Clone)]
pub struct FilePart {
    pub data: Bytes,
    pub content_type: String,
    pub file_name: Option<String>,
}

/// Parsed multipart body
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<FilePart>,
    pub path: Option<String>,
    pub action: UploadAction,
}

impl UploadForm {
    /// Read every field of the form; unknown fields are ignored
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("file") => {
                    let content_type = field
                        .content_type()
                        .filter(|ct| !ct.is_empty())
                        .unwrap_or(DEFAULT_CONTENT_TYPE)
                        .to_string();
                    let file_name = field.file_name().map(str::to_string);
                    let data = field.bytes().await?;
                    form.file = Some(FilePart {
                        data,
                        content_type,
                        file_name,
                    });
                }
                Some("path") => {
                    let path = field.text().await?;
                    form.path = Some(path).filter(|p| !p.is_empty());
                }
                Some("action") => {
                    form.action = field.text().await?.parse()?;
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

/// Entry point for every method and path
pub async fn upload_function(State(state): State<Arc<AppState>>, request: Request) -> Response {
    match *request.method() {
        Method::OPTIONS => preflight(),
        Method::POST => handle_post(&state, request)
            .await
            .unwrap_or_else(|e| e.into_response()),
        _ => ApiError::MethodNotAllowed.into_response(),
    }
}

/// CORS preflight answer
pub fn preflight() -> Response {
    with_cors((StatusCode::OK, "ok").into_response())
}

async fn handle_post(state: &AppState, request: Request) -> Result<Response, ApiError> {
    let authorized = {
        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        match state.config.admin_secret() {
            Some(secret) => verify_admin_token(auth_header, secret),
            None => {
                warn!("Rejecting request: admin token secret is not configured");
                false
            }
        }
    };
    if !authorized {
        return Err(ApiError::Unauthorized);
    }

    let settings = state
        .config
        .storage_settings()
        .ok_or(ApiError::NotConfigured)?;

    let multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| ApiError::Internal(e.body_text()))?;
    let form = UploadForm::read(multipart).await?;

    let hosts = build_host_candidates(&settings.region);
    // One key for both the storage request and the returned URL
    let path = form
        .path
        .as_deref()
        .map(normalize_object_path)
        .filter(|p| !p.is_empty());

    match form.action {
        UploadAction::Delete => {
            let path = path.unwrap_or_default();
            let stored = state.storage.delete(&hosts, &settings.zone, path).await?;
            info!(path = %path, host = %stored.host, "File deleted");

            Ok(json_response(StatusCode::OK, json!({ "success": true })))
        }
        UploadAction::Upload => {
            let (Some(file), Some(path)) = (form.file, path) else {
                return Err(ApiError::MissingFields);
            };

            let size = file.data.len();
            let stored = state
                .storage
                .put(&hosts, &settings.zone, path, &file.content_type, file.data)
                .await?;
            info!(
                path = %path,
                size,
                file_name = ?file.file_name,
                content_type = %file.content_type,
                host = %stored.host,
                "File uploaded"
            );

            let url = format!("https://{}/{}", settings.cdn_hostname, path);
            Ok(json_response(
                StatusCode::OK,
                json!({
                    "url": url,
                    "storage_host_used": stored.host,
                    "detected_region": stored.detected_region,
                }),
            ))
        }
    }
}
