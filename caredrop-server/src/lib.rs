pub mod config;

use caredrop_axum::{UploadApp, UploadState};
use caredrop_blob::{AzureBlobStore, BlobAdapter, MemoryBlobStore, S3CompatibleStore};

pub use config::{ServerConfig, StorageSettings};

/// Assemble the gateway: `POST /upload`, `GET /health` and the shared layers.
///
/// Storage problems do not stop the server; uploads then fail with
/// a configuration error until it is restarted with valid settings.
pub async fn build(config: &ServerConfig) -> UploadApp {
    let gateway = config.gateway_config();
    let state = match connect_storage(config).await {
        Some(adapter) => UploadState::new(adapter, gateway),
        None => UploadState::unconfigured(gateway),
    };

    UploadApp::new(state)
        .upload("/upload")
        .service("/health", || async { "ok" })
        .with_layers()
}

/// Build the configured backend and make sure the container exists
pub async fn connect_storage(config: &ServerConfig) -> Option<BlobAdapter> {
    let blob_config = config.blob_config();

    let adapter = match &config.storage {
        StorageSettings::Azure {
            connection_string: Some(raw),
        } => match AzureBlobStore::from_connection_string(raw) {
            Ok(store) => BlobAdapter::new(store, blob_config),
            Err(e) => {
                tracing::warn!(error = %e, "Azure storage connection string rejected");
                return None;
            }
        },
        StorageSettings::S3(Some(s3)) => match S3CompatibleStore::new(s3.clone()).await {
            Ok(store) => BlobAdapter::new(store, blob_config),
            Err(e) => {
                tracing::warn!(error = %e, "S3 storage could not be configured");
                return None;
            }
        },
        StorageSettings::Memory => BlobAdapter::new(MemoryBlobStore::new(), blob_config),
        unconfigured => {
            tracing::warn!(
                backend = unconfigured.backend(),
                "No storage credentials configured; uploads will fail"
            );
            return None;
        }
    };

    if let Err(e) = adapter.ensure_container().await {
        tracing::warn!(
            container = adapter.container(),
            error = %e,
            "Could not verify storage container"
        );
    }

    tracing::info!(
        backend = adapter.store().kind(),
        container = adapter.container(),
        "Storage configured"
    );

    Some(adapter)
}
