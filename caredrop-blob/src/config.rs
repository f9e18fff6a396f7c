/// Container used when no override is configured
pub const DEFAULT_CONTAINER: &str = "healthcare-files";

/// Configuration for blob operations
#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// Container (bucket) every upload is written to
    pub container: String,

    /// Absolute max size allowed for a single blob (safety guard)
    pub max_blob_bytes: u64,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            container: DEFAULT_CONTAINER.to_string(),
            max_blob_bytes: 100 * 1024 * 1024, // 100MB
        }
    }
}

impl BlobConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target container
    pub fn with_container<S: Into<String>>(mut self, container: S) -> Self {
        self.container = container.into();
        self
    }

    /// Set max blob size
    pub fn with_max_blob_bytes(mut self, bytes: u64) -> Self {
        self.max_blob_bytes = bytes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_healthcare_files() {
        let config = BlobConfig::default();
        assert_eq!(config.container, "healthcare-files");
        assert_eq!(config.max_blob_bytes, 100 * 1024 * 1024);
    }

    #[test]
    fn builder_overrides() {
        let config = BlobConfig::new()
            .with_container("radiology")
            .with_max_blob_bytes(1024);
        assert_eq!(config.container, "radiology");
        assert_eq!(config.max_blob_bytes, 1024);
    }
}
