use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;

use crate::{
    BlobConfig, BlobError, BlobKeyStrategy, BlobPut, BlobReceipt, BlobResult, BlobStore,
    TimestampKeyStrategy,
};

/// Ties the naming strategy to a storage backend - this is what the gateway embeds
#[derive(Clone)]
pub struct BlobAdapter {
    store: Arc<dyn BlobStore>,
    keys: Arc<dyn BlobKeyStrategy>,
    config: BlobConfig,
}

impl BlobAdapter {
    /// Create a new blob adapter with the timestamped key strategy
    pub fn new<S: BlobStore + 'static>(store: S, config: BlobConfig) -> Self {
        Self::from_arc(Arc::new(store), config)
    }

    /// Create from an already shared store
    pub fn from_arc(store: Arc<dyn BlobStore>, config: BlobConfig) -> Self {
        Self {
            store,
            keys: Arc::new(TimestampKeyStrategy),
            config,
        }
    }

    /// Replace the key strategy
    pub fn with_key_strategy<K: BlobKeyStrategy + 'static>(mut self, keys: K) -> Self {
        self.keys = Arc::new(keys);
        self
    }

    /// Store one blob. Exactly one write is issued; failures are not retried.
    pub async fn put(&self, put: BlobPut, data: Bytes) -> BlobResult<BlobReceipt> {
        let size = data.len() as u64;
        if size > self.config.max_blob_bytes {
            return Err(BlobError::TooLarge {
                size,
                limit: self.config.max_blob_bytes,
            });
        }

        let name = match &put.name {
            Some(name) if !name.is_empty() => name.clone(),
            Some(_) => return Err(BlobError::invalid("Blob name must not be empty")),
            None => self.keys.object_key(Utc::now(), &put.original_filename),
        };
        let content_type = put.content_type_or_default().to_string();

        tracing::debug!(
            backend = self.store.kind(),
            container = %self.config.container,
            blob = %name,
            size,
            "writing blob"
        );

        let result = self
            .store
            .put(&self.config.container, &name, Some(&content_type), data)
            .await?;

        Ok(BlobReceipt::new(
            name,
            self.config.container.clone(),
            result.url,
            result.size_bytes,
        )
        .with_content_type(content_type)
        .with_original_filename(put.original_filename)
        .with_etag(result.etag))
    }

    /// Create the configured container if needed
    pub async fn ensure_container(&self) -> BlobResult<()> {
        self.store.ensure_container(&self.config.container).await
    }

    /// Get configuration
    pub fn config(&self) -> &BlobConfig {
        &self.config
    }

    /// Target container
    pub fn container(&self) -> &str {
        &self.config.container
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBlobStore;

    #[tokio::test]
    async fn put_generates_name_and_keeps_extension() {
        let store = MemoryBlobStore::new();
        let adapter = BlobAdapter::new(store.clone(), BlobConfig::default());

        let receipt = adapter
            .put(
                BlobPut::new("report.pdf").with_content_type("application/pdf"),
                Bytes::from_static(b"%PDF-1.7"),
            )
            .await
            .unwrap();

        assert!(receipt.name.ends_with(".pdf"));
        assert_eq!(receipt.container, "healthcare-files");
        assert_eq!(receipt.size_bytes, 8);
        assert_eq!(receipt.content_type, "application/pdf");
        assert_eq!(receipt.original_filename, "report.pdf");
        assert!(receipt.url.ends_with(&format!("/healthcare-files/{}", receipt.name)));

        let stored = store.get("healthcare-files", &receipt.name).unwrap();
        assert_eq!(&stored.data[..], b"%PDF-1.7");
    }

    #[tokio::test]
    async fn put_with_explicit_name_overwrites() {
        let store = MemoryBlobStore::new();
        let adapter = BlobAdapter::new(store.clone(), BlobConfig::default());

        for body in [&b"first"[..], &b"second"[..]] {
            adapter
                .put(
                    BlobPut::new("notes.txt").with_name("notes.txt"),
                    Bytes::copy_from_slice(body),
                )
                .await
                .unwrap();
        }

        assert_eq!(store.len("healthcare-files"), 1);
        let stored = store.get("healthcare-files", "notes.txt").unwrap();
        assert_eq!(&stored.data[..], b"second");
    }

    #[tokio::test]
    async fn put_rejects_oversized_blob_without_writing() {
        let store = MemoryBlobStore::new();
        let adapter = BlobAdapter::new(store.clone(), BlobConfig::new().with_max_blob_bytes(4));

        let err = adapter
            .put(BlobPut::new("big.bin"), Bytes::from_static(b"12345"))
            .await
            .unwrap_err();

        assert!(matches!(err, BlobError::TooLarge { size: 5, limit: 4 }));
        assert_eq!(store.len("healthcare-files"), 0);
    }

    #[tokio::test]
    async fn put_surfaces_backend_failure() {
        let store = MemoryBlobStore::new();
        store.fail_with("simulated network failure");
        let adapter = BlobAdapter::new(store, BlobConfig::default());

        let err = adapter
            .put(BlobPut::new("a.txt"), Bytes::from_static(b"a"))
            .await
            .unwrap_err();

        assert!(err.is_backend());
        assert!(err.to_string().contains("simulated network failure"));
    }
}
