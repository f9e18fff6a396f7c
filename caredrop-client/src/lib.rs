//! Test client for the upload gateway.
//!
//! Posts one local file as the `file` part of a multipart form and reports
//! what the gateway answered.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Header an API management gateway in front of the service expects
pub const API_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const UPLOAD_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("File {} not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Fields of a successful upload response. Missing fields are tolerated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub file_name: Option<String>,
    pub file_url: Option<String>,
    pub upload_time: Option<String>,
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// HTTP 200
    Uploaded(UploadSummary),
    /// Any other status; `error` is the `"error"` field when the body was JSON
    Rejected {
        status: u16,
        error: Option<String>,
        body: String,
    },
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Uploaded(_))
    }

    /// Process exit code: 0 only for a successful upload
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    /// Human-readable report
    pub fn render(&self) -> String {
        fn or_none(v: &Option<String>) -> &str {
            v.as_deref().unwrap_or("None")
        }

        match self {
            Self::Uploaded(summary) => {
                let size = summary
                    .file_size
                    .map_or_else(|| "None".to_string(), |s| s.to_string());
                format!(
                    "Upload successful!\n   File Name: {}\n   File URL: {}\n   Upload Time: {}\n   File Size: {size} bytes",
                    or_none(&summary.file_name),
                    or_none(&summary.file_url),
                    or_none(&summary.upload_time),
                )
            }
            Self::Rejected {
                status,
                error: Some(error),
                ..
            } => format!("Upload failed with status {status}\n   Error: {error}"),
            Self::Rejected {
                status,
                error: None,
                body,
            } => format!("Upload failed with status {status}\n   Response: {body}"),
        }
    }
}

#[derive(Clone)]
pub struct UploadClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl UploadClient {
    pub fn new(api_key: Option<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    /// Post `file_path` to `api_url`. Exactly one attempt is made.
    pub async fn upload(&self, api_url: &str, file_path: &Path) -> Result<UploadOutcome, ClientError> {
        if !file_path.is_file() {
            return Err(ClientError::FileNotFound(file_path.to_path_buf()));
        }

        let data = tokio::fs::read(file_path)
            .await
            .map_err(|source| ClientError::Read {
                path: file_path.to_path_buf(),
                source,
            })?;
        let filename = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        tracing::debug!(url = api_url, filename = %filename, size = data.len(), "posting upload");

        let part = Part::bytes(data)
            .file_name(filename)
            .mime_str(UPLOAD_CONTENT_TYPE)?;
        let form = Form::new().part("file", part);

        let mut request = self.http.post(api_url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::OK {
            if let Ok(summary) = serde_json::from_str::<UploadSummary>(&body) {
                return Ok(UploadOutcome::Uploaded(summary));
            }
            tracing::warn!("200 response was not a JSON upload result");
        }

        let error = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string));

        Ok(UploadOutcome::Rejected {
            status: status.as_u16(),
            error,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_report_lists_response_fields() {
        let outcome = UploadOutcome::Uploaded(UploadSummary {
            file_name: Some("20240115_143022_1a2b3c4d.pdf".into()),
            file_url: Some("https://acct.blob.core.windows.net/healthcare-files/20240115_143022_1a2b3c4d.pdf".into()),
            upload_time: Some("2024-01-15T14:30:22.000Z".into()),
            file_size: Some(1024),
        });

        let text = outcome.render();
        assert_eq!(outcome.exit_code(), 0);
        assert!(text.starts_with("Upload successful!"));
        assert!(text.contains("File Name: 20240115_143022_1a2b3c4d.pdf"));
        assert!(text.contains("File Size: 1024 bytes"));
    }

    #[test]
    fn rejection_prefers_error_field() {
        let outcome = UploadOutcome::Rejected {
            status: 400,
            error: Some("No file selected".into()),
            body: "{\"error\":\"No file selected\"}".into(),
        };
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(
            outcome.render(),
            "Upload failed with status 400\n   Error: No file selected"
        );
    }

    #[test]
    fn rejection_falls_back_to_raw_body() {
        let outcome = UploadOutcome::Rejected {
            status: 502,
            error: None,
            body: "Bad Gateway".into(),
        };
        assert!(outcome.render().ends_with("Response: Bad Gateway"));
    }

    #[test]
    fn success_report_shows_none_for_missing_fields() {
        let outcome = UploadOutcome::Uploaded(UploadSummary {
            file_name: Some("a.txt".into()),
            ..UploadSummary::default()
        });
        assert_eq!(
            outcome.render(),
            "Upload successful!\n   File Name: a.txt\n   File URL: None\n   Upload Time: None\n   File Size: None bytes"
        );
    }

    #[test]
    fn summary_tolerates_missing_fields() {
        let summary: UploadSummary = serde_json::from_str("{\"fileName\":\"a.txt\"}").unwrap();
        assert_eq!(summary.file_name.as_deref(), Some("a.txt"));
        assert_eq!(summary.file_size, None);
    }

    #[test]
    fn empty_api_key_is_not_sent() {
        let client = UploadClient::new(Some(String::new())).unwrap();
        assert!(client.api_key.is_none());
    }
}
