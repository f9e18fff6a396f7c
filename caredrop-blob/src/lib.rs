//! # caredrop-blob: blob naming and storage for the upload gateway
//!
//! Every upload lands in one container under a collision-resistant name:
//!
//! ```text
//! YYYYMMDD_HHMMSS_<8 hex>.<original extension>
//! 20240115_143022_1a2b3c4d.pdf
//! ```
//!
//! Storage sits behind the [`BlobStore`] trait, with three backends:
//!
//! - [`AzureBlobStore`]: Azure Blob Storage, authenticated from a connection string
//! - [`S3CompatibleStore`]: MinIO, RustFS or AWS S3
//! - [`MemoryBlobStore`]: in-process, for tests and local runs
//!
//! ## Quick Start
//!
//! ```rust
//! use caredrop_blob::prelude::*;
//! use caredrop_blob::MemoryBlobStore;
//!
//! # #[tokio::main]
//! # async fn main() -> BlobResult<()> {
//! let adapter = BlobAdapter::new(MemoryBlobStore::new(), BlobConfig::default());
//!
//! let receipt = adapter
//!     .put(
//!         BlobPut::new("scan.pdf").with_content_type("application/pdf"),
//!         bytes::Bytes::from_static(b"%PDF-1.7"),
//!     )
//!     .await?;
//!
//! assert!(receipt.name.ends_with(".pdf"));
//! # Ok(())
//! # }
//! ```
//!
//! `BlobAdapter` is infrastructure, not a service: the HTTP layer embeds it
//! and owns validation and response shaping.

mod adapter;
mod azure_store;
mod config;
pub mod connection;
mod error;
mod file;
mod memory_store;
pub mod naming;
mod receipt;
mod s3_store;
pub mod store;
mod types;

pub use adapter::BlobAdapter;
pub use azure_store::AzureBlobStore;
pub use config::{BlobConfig, DEFAULT_CONTAINER};
pub use connection::ConnectionString;
pub use error::{BlobError, BlobResult};
pub use file::{upload_file_to_blob, upload_path};
pub use memory_store::{MemoryBlobStore, StoredBlob};
pub use naming::{extension_of, BlobKeyStrategy, TimestampKeyStrategy};
pub use receipt::BlobReceipt;
pub use s3_store::{S3CompatibleStore, S3Config};
pub use store::{BlobStore, PutResult};
pub use types::{BlobPut, DEFAULT_CONTENT_TYPE};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BlobAdapter, BlobConfig, BlobError, BlobPut, BlobReceipt, BlobResult, BlobStore,
    };
}
