//! # Tankobon Storage
//!
//! Relay layer between the Tankobon upload service and the object-storage
//! provider (Bunny Storage).
//!
//! This crate provides:
//! - **Endpoint discovery**: Ordered regional host candidates for a zone
//! - **Gateway**: PUT/DELETE with fallback across regional hosts
//! - **Transport**: The `StorageTransport` seam plus a reqwest implementation
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Upload Service               │
//! ├─────────────────────────────────────────┤
//! │   build_host_candidates │ StorageGateway│
//! ├─────────────────────────────────────────┤
//! │          StorageTransport Trait         │
//! ├────────────────────┬────────────────────┤
//! │   HttpTransport    │   (test doubles)   │
//! ├────────────────────┴────────────────────┤
//! │   <region>.storage.bunnycdn.com/<zone>  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use tankobon_storage::{build_host_candidates, HttpTransport, StorageGateway, ZoneCredentials};
//!
//! let gateway = StorageGateway::new(Arc::new(HttpTransport::new(Duration::from_secs(30))?));
//! let hosts = build_host_candidates("de");
//! let zone = ZoneCredentials::new("my-zone", api_key);
//! let stored = gateway.put(&hosts, &zone, "covers/1.webp", "image/webp", data).await?;
//! ```

pub mod error;
pub mod gateway;
pub mod region;
pub mod transport;

pub use error::{Result, StorageError, TransportError};
pub use gateway::{StorageGateway, StoredObject, ZoneCredentials};
pub use region::{
    build_host_candidates, detect_region, host_for_region, DEFAULT_STORAGE_HOST, PROVIDER_DOMAIN,
    REGION_CATALOG,
};
pub use transport::{
    normalize_object_path, HttpTransport, ProviderMethod, ProviderRequest, ProviderResponse,
    StorageTransport,
};
