use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use caredrop_blob::BlobError;
use serde_json::json;
use thiserror::Error;

/// Everything that can end an upload request early.
///
/// The `Display` text is exactly what the client sees under `"error"`.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file provided. Please include a 'file' in your form data.")]
    NoFile,

    #[error("No file selected")]
    NoFilename,

    #[error("Error processing uploaded file")]
    Malformed {
        #[source]
        source: multer::Error,
    },

    #[error("File exceeds the maximum upload size of {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("Storage configuration error")]
    Configuration,

    #[error("Invalid file: {message}")]
    Rejected { message: String },

    #[error("Error uploading file: {0}")]
    Storage(#[source] BlobError),

    #[error("Internal server error")]
    Internal,
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoFile | Self::NoFilename | Self::Malformed { .. } | Self::Rejected { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Configuration | Self::Storage(_) | Self::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// The adapter's own checks are the caller's fault; everything else is a storage failure.
impl From<BlobError> for UploadError {
    fn from(err: BlobError) -> Self {
        match err {
            BlobError::TooLarge { limit, .. } => Self::TooLarge { limit },
            BlobError::Invalid { message } => Self::Rejected { message },
            other => Self::Storage(other),
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Self::Malformed { source } => {
                tracing::warn!(status = status.as_u16(), error = %source, "Rejected malformed multipart body");
            }
            Self::Storage(source) => {
                tracing::error!(status = status.as_u16(), error = %source, "Blob upload failed");
            }
            Self::Configuration => {
                tracing::error!(status = status.as_u16(), "Storage is not configured");
            }
            _ if status.is_server_error() => {
                tracing::error!(status = status.as_u16(), error = %self, "Upload failed");
            }
            _ => {
                tracing::warn!(status = status.as_u16(), error = %self, "Rejected upload");
            }
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
