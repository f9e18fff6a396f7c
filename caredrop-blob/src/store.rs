use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::BlobResult;

/// Core blob storage operations - must be implemented by all storage backends
///
/// A write is create-or-replace: putting the same key twice leaves the
/// second body in place.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `key` in `container` and return its address
    async fn put(
        &self,
        container: &str,
        key: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> BlobResult<PutResult>;

    /// Create the container if it does not exist yet
    async fn ensure_container(&self, container: &str) -> BlobResult<()>;

    /// Fetchable URL of a blob, without touching the network
    fn blob_url(&self, container: &str, key: &str) -> String;

    /// Short backend name for logs
    fn kind(&self) -> &'static str;
}

/// Result of a successful put operation
#[derive(Debug, Clone)]
pub struct PutResult {
    pub url: String,
    pub etag: Option<String>,
    pub size_bytes: u64,
}

impl PutResult {
    pub fn new(url: String, size_bytes: u64) -> Self {
        Self {
            url,
            etag: None,
            size_bytes,
        }
    }

    pub fn with_etag(mut self, etag: Option<String>) -> Self {
        self.etag = etag;
        self
    }
}

/// Join a base endpoint, container and key into a URL path
pub(crate) fn join_url(endpoint: &str, container: &str, key: &str) -> String {
    format!(
        "{}/{}/{}",
        endpoint.trim_end_matches('/'),
        container,
        encode_key(key)
    )
}

/// Characters escaped in blob keys: everything but unreserved characters and `/`
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

fn encode_key(key: &str) -> String {
    utf8_percent_encode(key, KEY_ENCODE_SET).to_string()
}
