use std::fmt;

use async_trait::async_trait;
use azure_core::{RetryOptions, StatusCode};
use azure_storage::CloudLocation;
use azure_storage_blobs::prelude::*;
use bytes::Bytes;

use crate::connection::ConnectionString;
use crate::store::join_url;
use crate::{BlobError, BlobResult, BlobStore, PutResult};

/// Azure Blob Storage backend authenticated from a connection string
#[derive(Clone)]
pub struct AzureBlobStore {
    connection: ConnectionString,
    service: BlobServiceClient,
}

impl fmt::Debug for AzureBlobStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureBlobStore")
            .field("account_name", &self.connection.account_name)
            .field("blob_endpoint", &self.connection.blob_endpoint)
            .finish()
    }
}

impl AzureBlobStore {
    /// Build a client from `AZURE_STORAGE_CONNECTION_STRING`-style input.
    ///
    /// No request is made here; a bad key only shows up on the first write.
    pub fn from_connection_string(raw: &str) -> BlobResult<Self> {
        let connection = ConnectionString::parse(raw)?;
        Self::from_connection(connection)
    }

    /// Each request is sent once; the SDK's retry policy is switched off.
    pub fn from_connection(connection: ConnectionString) -> BlobResult<Self> {
        let location = cloud_location(&connection)?;
        let service = ClientBuilder::with_location(location, connection.credentials().clone())
            .retry(RetryOptions::none())
            .blob_service_client();

        tracing::info!(
            account = %connection.account_name,
            endpoint = %connection.blob_endpoint,
            "Created Azure Blob Storage client"
        );

        Ok(Self {
            connection,
            service,
        })
    }

    pub fn account_name(&self) -> &str {
        &self.connection.account_name
    }

    fn is_already_exists(err: &azure_core::Error) -> bool {
        err.as_http_error()
            .is_some_and(|e| e.status() == StatusCode::Conflict)
    }
}

/// Map the parsed endpoint onto the SDK's notion of a cloud
fn cloud_location(connection: &ConnectionString) -> BlobResult<CloudLocation> {
    if connection.is_public_cloud() {
        return Ok(CloudLocation::Public {
            account: connection.account_name.clone(),
        });
    }

    let url = azure_core::Url::parse(&connection.blob_endpoint).map_err(|e| {
        BlobError::configuration(format!("Invalid BlobEndpoint: {e}"))
    })?;
    let host = url
        .host_str()
        .ok_or_else(|| BlobError::configuration("Invalid BlobEndpoint: missing host"))?;

    if matches!(host, "127.0.0.1" | "localhost") {
        return Ok(CloudLocation::Emulator {
            address: host.to_string(),
            port: url.port().unwrap_or(10000),
        });
    }

    Ok(CloudLocation::Custom {
        account: connection.account_name.clone(),
        uri: connection.blob_endpoint.clone(),
    })
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    async fn put(
        &self,
        container: &str,
        key: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> BlobResult<PutResult> {
        let size = data.len() as u64;
        let blob = self.service.container_client(container).blob_client(key);

        let mut request = blob.put_block_blob(data);
        if let Some(ct) = content_type {
            request = request.content_type(ct.to_string());
        }

        request.await.map_err(BlobError::backend_with_causes)?;

        tracing::debug!(container, blob = key, size, "Uploaded block blob");

        Ok(PutResult::new(self.blob_url(container, key), size))
    }

    async fn ensure_container(&self, container: &str) -> BlobResult<()> {
        let client = self.service.container_client(container);

        match client.exists().await {
            Ok(true) => {
                tracing::debug!(container, "Container already exists");
                return Ok(());
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(container, error = %e, "Could not check container existence, attempting to create");
            }
        }

        match client.create().await {
            Ok(_) => {
                tracing::info!(container, "Created container");
                Ok(())
            }
            Err(e) if Self::is_already_exists(&e) => Ok(()),
            Err(e) => Err(BlobError::backend_with_causes(e)),
        }
    }

    fn blob_url(&self, container: &str, key: &str) -> String {
        join_url(&self.connection.blob_endpoint, container, key)
    }

    fn kind(&self) -> &'static str {
        "azure"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PORTAL: &str =
        "DefaultEndpointsProtocol=https;AccountName=hcstore;AccountKey=a2V5a2V5a2V5;EndpointSuffix=core.windows.net";

    #[test]
    fn public_cloud_location() {
        let conn = ConnectionString::parse(PORTAL).unwrap();
        assert!(matches!(
            cloud_location(&conn).unwrap(),
            CloudLocation::Public { account } if account == "hcstore"
        ));
    }

    #[test]
    fn azurite_maps_to_emulator() {
        let conn = ConnectionString::parse("UseDevelopmentStorage=true").unwrap();
        assert!(matches!(
            cloud_location(&conn).unwrap(),
            CloudLocation::Emulator { address, port } if address == "127.0.0.1" && port == 10000
        ));
    }

    #[test]
    fn other_endpoints_are_custom() {
        let conn = ConnectionString::parse(
            "AccountName=hc;AccountKey=k;BlobEndpoint=https://files.example.org",
        )
        .unwrap();
        assert!(matches!(cloud_location(&conn).unwrap(), CloudLocation::Custom { .. }));
    }

    #[test]
    fn blob_url_uses_account_endpoint() {
        let store = AzureBlobStore::from_connection_string(PORTAL).unwrap();
        assert_eq!(store.account_name(), "hcstore");
        assert_eq!(
            store.blob_url("healthcare-files", "20240115_143022_1a2b3c4d.pdf"),
            "https://hcstore.blob.core.windows.net/healthcare-files/20240115_143022_1a2b3c4d.pdf"
        );
    }

    #[test]
    fn rejects_incomplete_connection_string() {
        let err = AzureBlobStore::from_connection_string("AccountName=hc").unwrap_err();
        assert!(matches!(err, BlobError::Configuration { .. }));
    }

    async fn http_error(status: StatusCode) -> azure_core::Error {
        let response = azure_core::Response::new(
            status,
            azure_core::headers::Headers::new(),
            Box::pin(azure_core::BytesStream::new_empty()),
        );
        let error = azure_core::error::HttpError::new(response).await;
        azure_core::Error::new(
            azure_core::error::ErrorKind::http_response(status, None),
            error,
        )
    }

    #[tokio::test]
    async fn only_a_409_response_means_the_container_exists() {
        assert!(AzureBlobStore::is_already_exists(
            &http_error(StatusCode::Conflict).await
        ));
        assert!(!AzureBlobStore::is_already_exists(
            &http_error(StatusCode::Forbidden).await
        ));
        assert!(!AzureBlobStore::is_already_exists(&azure_core::Error::message(
            azure_core::error::ErrorKind::Io,
            "connection reset after 409 bytes",
        )));
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails_once_with_the_connection_error() {
        let store = AzureBlobStore::from_connection_string(
            "AccountName=devstoreaccount1;AccountKey=a2V5;BlobEndpoint=http://127.0.0.1:1/devstoreaccount1",
        )
        .unwrap();

        let started = std::time::Instant::now();
        let err = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            store.put("healthcare-files", "a.txt", None, Bytes::from_static(b"a")),
        )
        .await
        .expect("write was retried instead of failing")
        .unwrap_err();

        assert!(err.is_backend());
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
        let message = err.to_string().to_lowercase();
        assert!(
            message.contains("connect") || message.contains("refused"),
            "cause missing from: {message}"
        );
    }
}
