use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Receipt returned after successfully storing a blob
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobReceipt {
    /// Generated (or explicitly requested) blob name
    pub name: String,
    pub container: String,
    pub url: String,
    pub size_bytes: u64,
    pub content_type: String,
    pub original_filename: String,
    pub etag: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl BlobReceipt {
    /// Create a new blob receipt stamped with the current time
    pub fn new(name: String, container: String, url: String, size_bytes: u64) -> Self {
        Self {
            name,
            container,
            url,
            size_bytes,
            content_type: crate::types::DEFAULT_CONTENT_TYPE.to_string(),
            original_filename: String::new(),
            etag: None,
            uploaded_at: Utc::now(),
        }
    }

    /// Set content type
    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Set the client-side filename
    pub fn with_original_filename<S: Into<String>>(mut self, filename: S) -> Self {
        self.original_filename = filename.into();
        self
    }

    /// Set etag
    pub fn with_etag(mut self, etag: Option<String>) -> Self {
        self.etag = etag;
        self
    }
}
