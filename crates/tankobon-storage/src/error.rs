//! Error types for the tankobon-storage crate

use std::time::Duration;
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Failure of a single provider request before any status was received
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request did not complete in time
    #[error("request to {host} timed out after {timeout:?}")]
    Timeout { host: String, timeout: Duration },

    /// Connection, DNS or protocol failure
    #[error("request to {host} failed: {message}")]
    Connection { host: String, message: String },
}

/// Errors reported by the storage gateway
///
/// The `Display` output is the diagnostic handed back to API callers, so it
/// never contains the zone access key.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No candidate hosts were supplied
    #[error("No storage hosts available to try")]
    NoHosts,

    /// Delete was asked to run without a destination path
    #[error("A non-empty path is required to delete a file")]
    MissingPath,

    /// Every candidate answered 401
    #[error(
        "Storage authentication failed on every endpoint (tried: {}). \
         Check that BUNNY_STORAGE_API_KEY is the storage zone password and that \
         BUNNY_STORAGE_ZONE matches the zone name exactly, or set BUNNY_STORAGE_REGION \
         to the zone's primary region. Last response: {last_body}",
        .attempted.join(", ")
    )]
    AllUnauthorized {
        attempted: Vec<String>,
        last_body: String,
    },

    /// A non-401 error status; not region related
    #[error("Storage provider returned {status} from {host}: {body}")]
    Provider {
        host: String,
        status: u16,
        body: String,
    },

    /// The request never produced a status
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl StorageError {
    /// Hosts that were contacted before the error was reported
    pub fn attempted_hosts(&self) -> &[String] {
        match self {
            Self::AllUnauthorized { attempted, .. } => attempted,
            _ => &[],
        }
    }
}
