//! caredrop-axum: the HTTP upload gateway.
//!
//! `POST /upload` takes a `multipart/form-data` body with a `file` part,
//! stores it through a [`caredrop_blob::BlobAdapter`] and answers with JSON.
//! Failures are always `{"error": "..."}`.

pub mod app;
mod config;
mod error;
pub mod multipart;
mod state;
pub mod upload;

pub use app::{gateway, UploadApp};
pub use config::{GatewayConfig, DEFAULT_FILE_FIELD, DEFAULT_MAX_FILE_BYTES};
pub use error::UploadError;
pub use state::UploadState;
pub use upload::{UploadResult, SUCCESS_MESSAGE};
