use axum::extract::{Request, State};
use axum::Json;
use caredrop_blob::{BlobPut, BlobReceipt};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::multipart::find_file_field;
use crate::{UploadError, UploadState};

pub const SUCCESS_MESSAGE: &str = "File uploaded successfully";

/// Body of a successful `POST /upload`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub message: String,
    pub file_name: String,
    pub original_file_name: String,
    pub file_url: String,
    /// ISO-8601, UTC
    pub upload_time: String,
    pub file_size: u64,
}

impl From<BlobReceipt> for UploadResult {
    fn from(receipt: BlobReceipt) -> Self {
        Self {
            message: SUCCESS_MESSAGE.to_string(),
            file_name: receipt.name,
            original_file_name: receipt.original_filename,
            file_url: receipt.url,
            upload_time: receipt
                .uploaded_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            file_size: receipt.size_bytes,
        }
    }
}

/// `POST /upload`: store the `file` part under a generated name.
///
/// Input is validated before storage configuration is checked, and the
/// file is only buffered once both pass.
pub async fn upload_file(
    State(state): State<UploadState>,
    request: Request,
) -> Result<Json<UploadResult>, UploadError> {
    let pending = find_file_field(request, &state.config).await?;
    let storage = state.storage()?;
    let file = pending.read().await?;

    let mut put = BlobPut::new(file.filename);
    if let Some(content_type) = file.content_type {
        put = put.with_content_type(content_type);
    }

    let receipt = storage.put(put, file.data).await?;

    tracing::info!(
        blob = %receipt.name,
        original = %receipt.original_filename,
        container = %receipt.container,
        size = receipt.size_bytes,
        "File uploaded"
    );

    Ok(Json(UploadResult::from(receipt)))
}
