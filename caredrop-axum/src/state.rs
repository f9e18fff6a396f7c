use std::sync::Arc;

use caredrop_blob::BlobAdapter;

use crate::{GatewayConfig, UploadError};

/// Shared, read-only state handed to every upload request
#[derive(Clone)]
pub struct UploadState {
    /// `None` when no storage credential was configured at startup
    pub storage: Option<BlobAdapter>,
    pub config: Arc<GatewayConfig>,
}

impl UploadState {
    pub fn new(storage: BlobAdapter, config: GatewayConfig) -> Self {
        Self {
            storage: Some(storage),
            config: Arc::new(config),
        }
    }

    /// State for a gateway whose storage could not be configured; every
    /// valid upload is answered with a configuration error.
    pub fn unconfigured(config: GatewayConfig) -> Self {
        Self {
            storage: None,
            config: Arc::new(config),
        }
    }

    pub fn storage(&self) -> Result<&BlobAdapter, UploadError> {
        self.storage.as_ref().ok_or(UploadError::Configuration)
    }
}
