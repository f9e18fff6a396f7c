//! Locates the upload field in a `multipart/form-data` body.
//!
//! Finding the field and reading its bytes are separate steps so the
//! handler can reject a request before buffering the file.

use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use bytes::{Bytes, BytesMut};
use multer::{Constraints, Field, Multipart, SizeLimit};

use crate::{GatewayConfig, UploadError};

/// Room for boundaries, part headers and small text fields
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// A fully read upload
#[derive(Debug, Clone)]
pub struct FilePart {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// The upload field, located but not yet read
pub struct PendingFile {
    field: Field<'static>,
    filename: String,
    content_type: Option<String>,
    max_bytes: u64,
}

impl PendingFile {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Buffer the field body into memory
    pub async fn read(mut self) -> Result<FilePart, UploadError> {
        let mut data = BytesMut::new();
        while let Some(chunk) = self
            .field
            .chunk()
            .await
            .map_err(|e| map_multer_error(e, self.max_bytes))?
        {
            data.extend_from_slice(&chunk);
        }

        Ok(FilePart {
            filename: self.filename,
            content_type: self.content_type,
            data: data.freeze(),
        })
    }
}

/// Walk the parts until the configured file field is found.
///
/// A request that is not multipart at all is treated like one without the
/// field. Other parts are skipped.
pub async fn find_file_field(
    request: Request,
    config: &GatewayConfig,
) -> Result<PendingFile, UploadError> {
    let boundary = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or(UploadError::NoFile)?;

    let constraints = Constraints::new().size_limit(
        SizeLimit::new()
            .whole_stream(config.max_file_bytes.saturating_add(MULTIPART_OVERHEAD))
            .for_field(config.file_field.clone(), config.max_file_bytes),
    );

    let stream = request.into_body().into_data_stream();
    let mut multipart = Multipart::with_constraints(stream, boundary, constraints);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| map_multer_error(e, config.max_file_bytes))?
    {
        if field.name() != Some(config.file_field.as_str()) {
            continue;
        }

        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(UploadError::NoFilename),
        };
        let content_type = field.content_type().map(|mime| mime.to_string());

        return Ok(PendingFile {
            field,
            filename,
            content_type,
            max_bytes: config.max_file_bytes,
        });
    }

    Err(UploadError::NoFile)
}

fn map_multer_error(err: multer::Error, limit: u64) -> UploadError {
    match err {
        multer::Error::FieldSizeExceeded { .. } | multer::Error::StreamSizeExceeded { .. } => {
            UploadError::TooLarge { limit }
        }
        source => UploadError::Malformed { source },
    }
}
