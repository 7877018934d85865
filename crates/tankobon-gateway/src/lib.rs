//! # Tankobon Upload Gateway
//!
//! Admin-only upload proxy for the Tankobon comic reader.
//!
//! This crate provides:
//! - **Authentication**: HS256 admin token verification
//! - **Upload/Delete**: Multipart form relay to Bunny Storage
//! - **Region fallback**: Probing regional storage endpoints until one accepts the zone
//! - **Rate Limiting**: Per-client request throttling
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              Admin dashboard (browser)              │
//! └─────────────────────────┬───────────────────────────┘
//!                           │ multipart POST + Bearer
//! ┌─────────────────────────▼───────────────────────────┐
//! │                  Upload Gateway                     │
//! ├─────────────────────────────────────────────────────┤
//! │  Rate Limiter │ Token Verifier │ Multipart Parser   │
//! ├─────────────────────────────────────────────────────┤
//! │                 tankobon-storage                    │
//! │     (host candidates, PUT/DELETE with fallback)     │
//! ├─────────────────────────────────────────────────────┤
//! │           <region>.storage.bunnycdn.com             │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{GatewayConfig, StorageSettings};
pub use error::ApiError;
pub use server::{run_server, run_server_with_shutdown};
pub use state::AppState;
