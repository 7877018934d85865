//! Main client implementation

use crate::types::DeleteResponse;
use crate::{ClientError, Config, Result, UploadedFile};
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{header, Client, Response};
use tracing::{debug, instrument};

/// Upload gateway client
pub struct UploadClient {
    config: Config,
    http: Client,
}

impl UploadClient {
    /// Create a new client with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self { config, http })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Upload a file to `path` and return its public URL
    #[instrument(skip(self, data))]
    pub async fn upload_file(
        &self,
        data: impl Into<Bytes>,
        file_name: &str,
        content_type: &str,
        path: &str,
    ) -> Result<UploadedFile> {
        let data = data.into();
        let part = Part::bytes(data.to_vec())
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = Form::new()
            .part("file", part)
            .text("path", path.to_string())
            .text("action", "upload");

        let response = self.post_form(form).await?;
        if !response.status().is_success() {
            return Err(error_from(response, "Upload failed").await);
        }

        response
            .json::<UploadedFile>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Delete the file stored at `path`
    #[instrument(skip(self))]
    pub async fn delete_file(&self, path: &str) -> Result<()> {
        let form = Form::new()
            .text("path", path.to_string())
            .text("action", "delete");

        let response = self.post_form(form).await?;
        if !response.status().is_success() {
            return Err(error_from(response, "Delete failed").await);
        }

        let body: DeleteResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        if !body.success {
            return Err(ClientError::InvalidResponse(
                "delete response did not report success".to_string(),
            ));
        }

        Ok(())
    }

    async fn post_form(&self, form: Form) -> Result<Response> {
        let token = self
            .config
            .access_token
            .as_deref()
            .ok_or(ClientError::NotAuthenticated)?;

        debug!("Sending POST request to {}", self.config.endpoint);
        let response = self
            .http
            .post(&self.config.endpoint)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .multipart(form)
            .send()
            .await?;

        Ok(response)
    }
}

async fn error_from(response: Response, fallback: &str) -> ClientError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    ClientError::from_response_body(status, &text, fallback)
}
