//! Gateway configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use tankobon_storage::ZoneCredentials;

/// Upload gateway configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Bunny storage zone name
    pub storage_zone: Option<String>,
    /// Storage zone password
    #[serde(skip_serializing)]
    pub storage_api_key: Option<String>,
    /// Public pull-zone hostname used to build returned URLs
    pub cdn_hostname: Option<String>,
    /// Primary storage region hint (e.g. "de"), empty for none
    pub storage_region: Option<String>,
    /// HMAC secret for admin tokens
    #[serde(skip_serializing)]
    pub admin_jwt_secret: Option<String>,
    /// Per-request timeout towards the storage provider (seconds)
    pub storage_timeout_secs: u64,
    /// Maximum request body size (bytes)
    pub max_body_size: usize,
    /// Rate limit (requests per second per client), 0 disables
    pub rate_limit_rps: u32,
    /// Key rate limiting on `x-forwarded-for` (only behind a trusted proxy)
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8787,
            storage_zone: None,
            storage_api_key: None,
            cdn_hostname: None,
            storage_region: None,
            admin_jwt_secret: None,
            storage_timeout_secs: 30,
            max_body_size: 100 * 1024 * 1024, // 100 MB
            rate_limit_rps: 50,
            trust_forwarded_for: false,
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("storage_zone", &self.storage_zone)
            .field("storage_api_key", &self.storage_api_key.as_ref().map(|_| "<redacted>"))
            .field("cdn_hostname", &self.cdn_hostname)
            .field("storage_region", &self.storage_region)
            .field("admin_jwt_secret", &self.admin_jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("storage_timeout_secs", &self.storage_timeout_secs)
            .field("max_body_size", &self.max_body_size)
            .field("rate_limit_rps", &self.rate_limit_rps)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .finish()
    }
}

/// Everything needed to reach the storage zone
#[derive(Clone, Debug)]
pub struct StorageSettings {
    pub zone: ZoneCredentials,
    pub cdn_hostname: String,
    pub region: String,
}

impl GatewayConfig {
    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Storage settings, or `None` when zone, key or CDN host is missing
    pub fn storage_settings(&self) -> Option<StorageSettings> {
        let zone = non_blank(&self.storage_zone)?;
        let api_key = non_blank(&self.storage_api_key)?;
        let cdn_hostname = non_blank(&self.cdn_hostname)?;
        let region = non_blank(&self.storage_region).unwrap_or_default();

        Some(StorageSettings {
            zone: ZoneCredentials::new(zone, api_key),
            cdn_hostname,
            region,
        })
    }

    /// Admin token secret, if set
    pub fn admin_secret(&self) -> Option<&str> {
        self.admin_jwt_secret
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
