use std::path::Path;

use bytes::Bytes;

use crate::{AzureBlobStore, BlobError, BlobResult, BlobStore};

/// Upload a local file to `container` under `blob_name`, replacing any
/// existing blob of that name, and return the blob URL.
///
/// The content type is left for the service to default.
pub async fn upload_path<P: AsRef<Path>>(
    store: &dyn BlobStore,
    file_path: P,
    blob_name: &str,
    container: &str,
) -> BlobResult<String> {
    if blob_name.is_empty() {
        return Err(BlobError::invalid("Blob name must not be empty"));
    }

    let file_path = file_path.as_ref();
    let data = tokio::fs::read(file_path).await?;

    tracing::debug!(
        path = %file_path.display(),
        container,
        blob = blob_name,
        size = data.len(),
        "uploading local file"
    );

    let result = store
        .put(container, blob_name, None, Bytes::from(data))
        .await?;
    Ok(result.url)
}

/// Upload a local file to Azure Blob Storage using a connection string
pub async fn upload_file_to_blob<P: AsRef<Path>>(
    file_path: P,
    blob_name: &str,
    connection_string: &str,
    container: &str,
) -> BlobResult<String> {
    let store = AzureBlobStore::from_connection_string(connection_string)?;
    upload_path(&store, file_path, blob_name, container).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBlobStore;
    use std::io::Write;

    #[tokio::test]
    async fn uploads_file_contents_under_given_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"patient intake form").unwrap();

        let store = MemoryBlobStore::new();
        let url = upload_path(&store, file.path(), "intake.txt", "healthcare-files")
            .await
            .unwrap();

        assert_eq!(url, "memory://local/healthcare-files/intake.txt");
        let blob = store.get("healthcare-files", "intake.txt").unwrap();
        assert_eq!(&blob.data[..], b"patient intake form");
    }

    #[tokio::test]
    async fn second_upload_replaces_the_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let store = MemoryBlobStore::new();

        tokio::fs::write(&path, b"v1").await.unwrap();
        upload_path(&store, &path, "notes.txt", "c").await.unwrap();
        tokio::fs::write(&path, b"v2").await.unwrap();
        upload_path(&store, &path, "notes.txt", "c").await.unwrap();

        assert_eq!(store.len("c"), 1);
        assert_eq!(&store.get("c", "notes.txt").unwrap().data[..], b"v2");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryBlobStore::new();

        let err = upload_path(&store, dir.path().join("absent.pdf"), "absent.pdf", "c")
            .await
            .unwrap_err();

        assert!(matches!(err, BlobError::Io { .. }));
        assert_eq!(store.len("c"), 0);
    }

    #[tokio::test]
    async fn bad_connection_string_fails_before_reading() {
        let err = upload_file_to_blob("/nonexistent", "x.txt", "AccountName=only", "c")
            .await
            .unwrap_err();
        assert!(matches!(err, BlobError::Configuration { .. }));
    }
}
