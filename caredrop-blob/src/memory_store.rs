use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use crate::store::join_url;
use crate::{BlobError, BlobResult, BlobStore, PutResult};

/// A blob held by [`MemoryBlobStore`]
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub data: Bytes,
    pub content_type: Option<String>,
}

type Containers = HashMap<String, HashMap<String, StoredBlob>>;

/// In-process store for tests and local runs.
///
/// Clones share the same contents. [`MemoryBlobStore::fail_with`] makes every
/// subsequent write fail with a backend error, standing in for an unreachable
/// storage account.
#[derive(Clone)]
pub struct MemoryBlobStore {
    base_url: String,
    containers: Arc<RwLock<Containers>>,
    failure: Arc<RwLock<Option<String>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::with_base_url("memory://local")
    }

    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            containers: Arc::new(RwLock::new(HashMap::new())),
            failure: Arc::new(RwLock::new(None)),
        }
    }

    /// Fail all writes with `message` until [`MemoryBlobStore::recover`] is called
    pub fn fail_with<S: Into<String>>(&self, message: S) {
        *self.failure.write() = Some(message.into());
    }

    pub fn recover(&self) {
        *self.failure.write() = None;
    }

    pub fn get(&self, container: &str, key: &str) -> Option<StoredBlob> {
        self.containers
            .read()
            .get(container)
            .and_then(|blobs| blobs.get(key))
            .cloned()
    }

    /// Number of blobs in `container`
    pub fn len(&self, container: &str) -> usize {
        self.containers
            .read()
            .get(container)
            .map_or(0, HashMap::len)
    }

    pub fn has_container(&self, container: &str) -> bool {
        self.containers.read().contains_key(container)
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        container: &str,
        key: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> BlobResult<PutResult> {
        if let Some(message) = self.failure.read().clone() {
            return Err(BlobError::backend(std::io::Error::new(
                std::io::ErrorKind::Other,
                message,
            )));
        }

        let size = data.len() as u64;
        self.containers
            .write()
            .entry(container.to_string())
            .or_default()
            .insert(
                key.to_string(),
                StoredBlob {
                    data,
                    content_type: content_type.map(str::to_string),
                },
            );

        Ok(PutResult::new(self.blob_url(container, key), size))
    }

    async fn ensure_container(&self, container: &str) -> BlobResult<()> {
        self.containers
            .write()
            .entry(container.to_string())
            .or_default();
        Ok(())
    }

    fn blob_url(&self, container: &str, key: &str) -> String {
        join_url(&self.base_url, container, key)
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get() {
        let store = MemoryBlobStore::new();
        let result = store
            .put("c", "k.txt", Some("text/plain"), Bytes::from_static(b"hi"))
            .await
            .unwrap();

        assert_eq!(result.url, "memory://local/c/k.txt");
        assert_eq!(result.size_bytes, 2);

        let blob = store.get("c", "k.txt").unwrap();
        assert_eq!(blob.content_type.as_deref(), Some("text/plain"));
    }

    #[tokio::test]
    async fn failure_switch_blocks_writes_until_recovered() {
        let store = MemoryBlobStore::new();
        store.fail_with("quota exceeded");

        let err = store
            .put("c", "k", None, Bytes::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(store.len("c"), 0);

        store.recover();
        store.put("c", "k", None, Bytes::new()).await.unwrap();
        assert_eq!(store.len("c"), 1);
    }

    #[tokio::test]
    async fn ensure_container_is_idempotent() {
        let store = MemoryBlobStore::new();
        store.ensure_container("c").await.unwrap();
        store.ensure_container("c").await.unwrap();
        assert!(store.has_container("c"));
        assert_eq!(store.len("c"), 0);
    }
}
