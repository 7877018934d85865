//! Upload/delete relay with regional fallback
//!
//! Hosts are probed strictly in order. A 401 is a soft failure (it may only
//! mean "wrong region for this zone") and moves on to the next candidate;
//! any other error status is a hard failure and stops the loop, so at most
//! `hosts.len()` requests are made per call.

use crate::region::detect_region;
use crate::transport::{
    normalize_object_path, ProviderMethod, ProviderRequest, ProviderResponse, StorageTransport,
};
use crate::{Result, StorageError};
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const UNAUTHORIZED: u16 = 401;
const NOT_FOUND: u16 = 404;

/// Storage zone name and its password
#[derive(Clone)]
pub struct ZoneCredentials {
    pub zone_id: String,
    pub api_key: String,
}

impl ZoneCredentials {
    pub fn new(zone_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            api_key: api_key.into(),
        }
    }
}

impl fmt::Debug for ZoneCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoneCredentials")
            .field("zone_id", &self.zone_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Where a successful operation landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Host that accepted the request
    pub host: String,
    /// Region code of `host`, `None` for the default endpoint
    pub detected_region: Option<String>,
}

/// True when `path` names nothing below the zone root
///
/// Dot segments count as empty since the transport drops them.
fn targets_zone_root(path: &str) -> bool {
    normalize_object_path(path.trim())
        .split('/')
        .all(|segment| matches!(segment.trim(), "" | "." | ".."))
}

impl StoredObject {
    fn from_host(host: &str) -> Self {
        Self {
            host: host.to_string(),
            detected_region: detect_region(host),
        }
    }
}

/// Relays uploads and deletes to the storage provider
#[derive(Clone)]
pub struct StorageGateway {
    transport: Arc<dyn StorageTransport>,
}

impl StorageGateway {
    pub fn new(transport: Arc<dyn StorageTransport>) -> Self {
        Self { transport }
    }

    /// Upload `body` to `<zone>/<path>` on the first host that accepts it
    pub async fn put(
        &self,
        hosts: &[String],
        zone: &ZoneCredentials,
        path: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<StoredObject> {
        let template = ProviderRequest {
            method: ProviderMethod::Put,
            host: String::new(),
            zone_id: zone.zone_id.clone(),
            path: path.to_string(),
            access_key: zone.api_key.clone(),
            content_type: Some(content_type.to_string()),
            body: Some(body),
        };

        self.probe(hosts, template, ProviderResponse::is_success).await
    }

    /// Delete `<zone>/<path>`; a missing object counts as deleted
    pub async fn delete(
        &self,
        hosts: &[String],
        zone: &ZoneCredentials,
        path: &str,
    ) -> Result<StoredObject> {
        if targets_zone_root(path) {
            warn!(zone = %zone.zone_id, "Refusing delete without a path");
            return Err(StorageError::MissingPath);
        }

        let template = ProviderRequest {
            method: ProviderMethod::Delete,
            host: String::new(),
            zone_id: zone.zone_id.clone(),
            path: path.to_string(),
            access_key: zone.api_key.clone(),
            content_type: None,
            body: None,
        };

        self.probe(hosts, template, |r| r.is_success() || r.status == NOT_FOUND)
            .await
    }

    async fn probe(
        &self,
        hosts: &[String],
        template: ProviderRequest,
        accepted: impl Fn(&ProviderResponse) -> bool,
    ) -> Result<StoredObject> {
        if hosts.is_empty() {
            error!(method = %template.method, "No storage hosts to try");
            return Err(StorageError::NoHosts);
        }

        let mut attempted = Vec::with_capacity(hosts.len());
        let mut last_body = String::new();

        for (attempt, host) in hosts.iter().enumerate() {
            attempted.push(host.clone());

            let request = ProviderRequest {
                host: host.clone(),
                ..template.clone()
            };
            debug!(
                method = %template.method,
                host = %host,
                attempt = attempt + 1,
                zone = %template.zone_id,
                path = %template.path,
                "Trying storage host"
            );

            let response = match self.transport.send(request).await {
                Ok(response) => response,
                Err(e) => {
                    error!(host = %host, error = %e, "Storage request failed");
                    return Err(e.into());
                }
            };

            if accepted(&response) {
                let stored = StoredObject::from_host(host);
                info!(
                    method = %template.method,
                    host = %host,
                    status = response.status,
                    region = ?stored.detected_region,
                    "Storage request succeeded"
                );
                return Ok(stored);
            }

            if response.status == UNAUTHORIZED {
                warn!(
                    host = %host,
                    status = response.status,
                    body = %response.body,
                    "Storage host rejected credentials, trying next region"
                );
                last_body = response.body;
                continue;
            }

            error!(
                host = %host,
                status = response.status,
                body = %response.body,
                "Storage provider error"
            );
            return Err(StorageError::Provider {
                host: host.clone(),
                status: response.status,
                body: response.body,
            });
        }

        error!(attempted = ?attempted, "Every storage host rejected credentials");
        Err(StorageError::AllUnauthorized {
            attempted,
            last_body,
        })
    }
}
