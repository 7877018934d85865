//! Application state

use crate::config::GatewayConfig;
use std::sync::Arc;
use std::time::Duration;
use tankobon_storage::{HttpTransport, StorageGateway, StorageTransport};
use tracing::{info, warn};

/// Application state shared across handlers
///
/// Nothing here is mutated per request.
pub struct AppState {
    /// Gateway configuration
    pub config: GatewayConfig,
    /// Relay to the storage provider
    pub storage: StorageGateway,
}

impl AppState {
    /// Create state backed by the HTTPS provider transport
    pub fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let transport = HttpTransport::new(Duration::from_secs(config.storage_timeout_secs))?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create state with an explicit transport
    pub fn with_transport(config: GatewayConfig, transport: Arc<dyn StorageTransport>) -> Self {
        match config.storage_settings() {
            Some(settings) => info!(
                zone = %settings.zone.zone_id,
                cdn = %settings.cdn_hostname,
                region = %settings.region,
                "Storage zone configured"
            ),
            None => warn!("Storage zone, API key or CDN hostname missing; uploads will fail"),
        }
        if config.admin_secret().is_none() {
            warn!("ADMIN_JWT_SECRET not set; every request will be rejected");
        }

        Self {
            config,
            storage: StorageGateway::new(transport),
        }
    }
}
