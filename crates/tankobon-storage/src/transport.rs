//! Provider transport
//!
//! One `StorageTransport::send` call is one HTTP request against one
//! storage host. Status classification lives in the gateway, not here.

use crate::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client, Url};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Header carrying the zone password
pub const ACCESS_KEY_HEADER: &str = "AccessKey";

/// HTTP verb used against the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderMethod {
    Put,
    Delete,
}

impl ProviderMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for ProviderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request to one storage host
#[derive(Clone)]
pub struct ProviderRequest {
    pub method: ProviderMethod,
    pub host: String,
    pub zone_id: String,
    pub path: String,
    pub access_key: String,
    pub content_type: Option<String>,
    pub body: Option<Bytes>,
}

/// Object key relative to the zone root: `path` without leading `/`
pub fn normalize_object_path(path: &str) -> &str {
    path.trim_start_matches('/')
}

impl ProviderRequest {
    /// Object path relative to the host: `<zone>/<path>`
    pub fn object_path(&self) -> String {
        format!("{}/{}", self.zone_id, normalize_object_path(&self.path))
    }
}

impl fmt::Debug for ProviderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRequest")
            .field("method", &self.method)
            .field("host", &self.host)
            .field("zone_id", &self.zone_id)
            .field("path", &self.path)
            .field("access_key", &"<redacted>")
            .field("content_type", &self.content_type)
            .field("body_len", &self.body.as_ref().map(Bytes::len))
            .finish()
    }
}

/// Status and body returned by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: String,
}

impl ProviderResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request to the storage provider
#[async_trait]
pub trait StorageTransport: Send + Sync {
    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse, TransportError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    http: Client,
    scheme: String,
    timeout: Duration,
}

impl HttpTransport {
    /// HTTPS transport with a per-request timeout
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        Self::with_scheme("https", timeout)
    }

    /// Transport with an explicit URL scheme (plain `http` for local mocks)
    pub fn with_scheme(scheme: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(format!("tankobon-storage/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Connection {
                host: String::new(),
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            scheme: scheme.into(),
            timeout,
        })
    }

    /// `<scheme>://<host>/<zone>/<path>` with every segment percent-encoded
    fn url_for(&self, request: &ProviderRequest) -> Result<Url, TransportError> {
        let invalid = |message: String| TransportError::Connection {
            host: request.host.clone(),
            message,
        };

        let mut url = Url::parse(&format!("{}://{}/", self.scheme, request.host))
            .map_err(|e| invalid(format!("invalid storage URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| invalid("storage URL cannot carry a path".to_string()))?
            .clear()
            .push(&request.zone_id)
            .extend(normalize_object_path(&request.path).split('/'));

        Ok(url)
    }
}

#[async_trait]
impl StorageTransport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, host = %request.host))]
    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse, TransportError> {
        let url = self.url_for(&request)?;
        debug!("Sending {} request to {}", request.method, url);

        let mut req = match request.method {
            ProviderMethod::Put => self.http.put(url),
            ProviderMethod::Delete => self.http.delete(url),
        }
        .header(ACCESS_KEY_HEADER, &request.access_key);

        if let Some(content_type) = &request.content_type {
            req = req.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(body) = request.body {
            req = req.body(body);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    host: request.host.clone(),
                    timeout: self.timeout,
                }
            } else {
                TransportError::Connection {
                    host: request.host.clone(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    host = %request.host,
                    status,
                    error = %e,
                    "Failed to read storage response body"
                );
                String::new()
            }
        };

        Ok(ProviderResponse { status, body })
    }
}
