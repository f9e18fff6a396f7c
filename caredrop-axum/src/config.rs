/// Multipart field that carries the upload
pub const DEFAULT_FILE_FIELD: &str = "file";

/// Default per-file limit (100 MiB)
pub const DEFAULT_MAX_FILE_BYTES: u64 = 100 * 1024 * 1024;

/// Request-side settings for the upload endpoint
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Name of the multipart field holding the file
    pub file_field: String,

    /// Largest accepted file; bigger uploads get 413
    pub max_file_bytes: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            file_field: DEFAULT_FILE_FIELD.to_string(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file_field<S: Into<String>>(mut self, field: S) -> Self {
        self.file_field = field.into();
        self
    }

    pub fn with_max_file_bytes(mut self, bytes: u64) -> Self {
        self.max_file_bytes = bytes;
        self
    }

    pub fn with_max_file_size_mb(self, megabytes: u64) -> Self {
        self.with_max_file_bytes(megabytes.saturating_mul(1024 * 1024))
    }
}
