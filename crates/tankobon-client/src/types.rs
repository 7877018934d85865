//! Response types

use serde::{Deserialize, Serialize};

/// Successful upload answer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Public CDN URL of the file
    pub url: String,
    /// Storage host that accepted the upload
    #[serde(default)]
    pub storage_host_used: Option<String>,
    /// Region of that host, `None` for the default endpoint
    #[serde(default)]
    pub detected_region: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteResponse {
    #[serde(default)]
    pub success: bool,
}
