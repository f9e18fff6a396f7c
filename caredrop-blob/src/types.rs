/// Content type stored when the uploader did not declare one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Request to store a blob
#[derive(Debug, Clone)]
pub struct BlobPut {
    /// Filename as sent by the client; drives the generated name's extension
    pub original_filename: String,
    pub content_type: Option<String>,
    /// Explicit blob name; when unset the key strategy generates one
    pub name: Option<String>,
}

impl BlobPut {
    pub fn new<S: Into<String>>(original_filename: S) -> Self {
        Self {
            original_filename: original_filename.into(),
            content_type: None,
            name: None,
        }
    }

    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declared content type, or `application/octet-stream`
    pub fn content_type_or_default(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}
