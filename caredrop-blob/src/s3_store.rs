use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::{primitives::ByteStream, Client};
use bytes::Bytes;

use crate::store::join_url;
use crate::{BlobError, BlobResult, BlobStore, PutResult};

/// Connection settings for an S3-compatible endpoint (MinIO, RustFS, AWS)
#[derive(Clone)]
pub struct S3Config {
    pub endpoint_url: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("endpoint_url", &self.endpoint_url)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .finish_non_exhaustive()
    }
}

impl S3Config {
    pub fn new<S: Into<String>>(endpoint_url: S, access_key_id: S, secret_access_key: S) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            region: "us-east-1".to_string(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    pub fn with_region<S: Into<String>>(mut self, region: S) -> Self {
        self.region = region.into();
        self
    }
}

/// S3-compatible store; containers map onto buckets
#[derive(Clone)]
pub struct S3CompatibleStore {
    client: Client,
    endpoint_url: String,
}

/// `SdkError` displays only "dispatch failure" or "service error"; keep the cause
fn sdk_error<E>(error: E) -> BlobError
where
    E: std::error::Error + Send + Sync + 'static,
{
    BlobError::backend_with_message(DisplayErrorContext(&error).to_string(), error)
}

impl S3CompatibleStore {
    /// Requests are sent once; the SDK's standard retry policy is disabled.
    pub async fn new(config: S3Config) -> BlobResult<Self> {
        if config.endpoint_url.is_empty() {
            return Err(BlobError::configuration("S3 endpoint URL is required"));
        }

        let endpoint_url = config.endpoint_url.trim_end_matches('/').to_string();
        let credentials = Credentials::new(
            config.access_key_id,
            config.secret_access_key,
            None,
            None,
            "caredrop",
        );

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region))
            .credentials_provider(credentials)
            .endpoint_url(endpoint_url.clone())
            .retry_config(RetryConfig::disabled())
            .load()
            .await;

        let client = Client::from_conf(
            aws_sdk_s3::config::Builder::from(&aws_config)
                .force_path_style(true)
                .build(),
        );

        Ok(Self {
            client,
            endpoint_url,
        })
    }
}

#[async_trait]
impl BlobStore for S3CompatibleStore {
    async fn put(
        &self,
        container: &str,
        key: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> BlobResult<PutResult> {
        let size = data.len() as u64;
        let mut request = self
            .client
            .put_object()
            .bucket(container)
            .key(key)
            .body(ByteStream::from(data));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        let result = request.send().await.map_err(sdk_error)?;

        Ok(PutResult::new(self.blob_url(container, key), size).with_etag(result.e_tag))
    }

    async fn ensure_container(&self, container: &str) -> BlobResult<()> {
        if self.client.head_bucket().bucket(container).send().await.is_ok() {
            return Ok(());
        }

        match self.client.create_bucket().bucket(container).send().await {
            Ok(_) => {
                tracing::info!(bucket = container, "Created bucket");
                Ok(())
            }
            Err(e) => {
                let already_there = e
                    .as_service_error()
                    .map(|se| se.is_bucket_already_owned_by_you() || se.is_bucket_already_exists())
                    .unwrap_or(false);
                if already_there {
                    Ok(())
                } else {
                    Err(sdk_error(e))
                }
            }
        }
    }

    fn blob_url(&self, container: &str, key: &str) -> String {
        join_url(&self.endpoint_url, container, key)
    }

    fn kind(&self) -> &'static str {
        "s3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn path_style_urls() {
        let store = S3CompatibleStore::new(
            S3Config::new("http://localhost:9000/", "minio", "minio123").with_region("eu-west-1"),
        )
        .await
        .unwrap();

        assert_eq!(store.kind(), "s3");
        assert_eq!(
            store.blob_url("healthcare-files", "20240115_143022_1a2b3c4d.png"),
            "http://localhost:9000/healthcare-files/20240115_143022_1a2b3c4d.png"
        );
    }

    #[tokio::test]
    async fn empty_endpoint_is_rejected() {
        let err = S3CompatibleStore::new(S3Config::new("", "a", "b"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, BlobError::Configuration { .. }));
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails_once_with_the_connection_error() {
        let store = S3CompatibleStore::new(S3Config::new("http://127.0.0.1:1", "minio", "minio123"))
            .await
            .unwrap();

        let err = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            store.put("healthcare-files", "a.txt", None, Bytes::from_static(b"a")),
        )
        .await
        .expect("write was retried instead of failing")
        .unwrap_err();

        assert!(err.is_backend());
        let message = err.to_string().to_lowercase();
        assert!(message.contains("dispatch failure"), "{message}");
        assert!(
            message.contains("connect") || message.contains("refused"),
            "cause missing from: {message}"
        );
    }

    #[test]
    fn debug_hides_secret() {
        let config = S3Config::new("http://localhost:9000", "minio", "topsecret");
        assert!(!format!("{config:?}").contains("topsecret"));
    }
}
