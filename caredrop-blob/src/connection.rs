//! Azure Storage connection strings.
//!
//! Parsing and credential selection are done by `azure_storage`; this wrapper
//! adds the blob endpoint the client writes to and the URLs it reports.
//!
//! ```text
//! DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=...;EndpointSuffix=core.windows.net
//! BlobEndpoint=http://127.0.0.1:10000/devstoreaccount1;AccountName=devstoreaccount1;AccountKey=...
//! BlobEndpoint=https://acct.blob.core.windows.net;SharedAccessSignature=sv=...
//! UseDevelopmentStorage=true
//! ```

use azure_storage::clients::EMULATOR_ACCOUNT;
use azure_storage::{EndpointProtocol, StorageCredentials};

use crate::{BlobError, BlobResult};

const DEV_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";
const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";

/// Parsed storage connection string.
///
/// `Debug` never prints the key or signature.
#[derive(Debug, Clone)]
pub struct ConnectionString {
    pub account_name: String,
    /// Base URL of the blob service, without a trailing slash
    pub blob_endpoint: String,
    /// Whether `blob_endpoint` came from an explicit `BlobEndpoint` (or dev storage)
    pub custom_endpoint: bool,
    credentials: StorageCredentials,
}

impl ConnectionString {
    pub fn parse(raw: &str) -> BlobResult<Self> {
        // SDK parse errors quote the whole input, key included
        let parsed = azure_storage::ConnectionString::new(raw.trim()).map_err(|_| {
            BlobError::configuration("Invalid connection string: expected Key=Value segments")
        })?;

        if parsed.use_development_storage == Some(true) {
            return Ok(Self {
                account_name: EMULATOR_ACCOUNT.to_string(),
                blob_endpoint: parsed
                    .blob_endpoint
                    .map_or(DEV_BLOB_ENDPOINT, |e| e.trim_end_matches('/'))
                    .to_string(),
                custom_endpoint: true,
                credentials: StorageCredentials::emulator(),
            });
        }

        let credentials = parsed.storage_credentials().map_err(|_| {
            BlobError::configuration(
                "Invalid connection string: needs AccountName with AccountKey, or SharedAccessSignature",
            )
        })?;

        let blob_endpoint = parsed.blob_endpoint.map(|e| e.trim_end_matches('/'));
        let account_name = parsed
            .account_name
            .map(str::to_string)
            .or_else(|| blob_endpoint.and_then(account_from_endpoint))
            .ok_or_else(|| BlobError::configuration("Invalid connection string: missing AccountName"))?;

        let custom_endpoint = blob_endpoint.is_some();
        let blob_endpoint = match blob_endpoint {
            Some(endpoint) => endpoint.to_string(),
            None => format!(
                "{}://{}.blob.{}",
                parsed
                    .default_endpoints_protocol
                    .unwrap_or(EndpointProtocol::Https),
                account_name,
                parsed.endpoint_suffix.unwrap_or(DEFAULT_ENDPOINT_SUFFIX)
            ),
        };

        Ok(Self {
            account_name,
            blob_endpoint,
            custom_endpoint,
            credentials,
        })
    }

    pub fn credentials(&self) -> &StorageCredentials {
        &self.credentials
    }

    /// Whether the endpoint is the public Azure cloud for this account
    pub fn is_public_cloud(&self) -> bool {
        !self.custom_endpoint
            && self.blob_endpoint
                == format!("https://{}.blob.{}", self.account_name, DEFAULT_ENDPOINT_SUFFIX)
    }
}

/// `https://acct.blob.core.windows.net` → `acct`
fn account_from_endpoint(endpoint: &str) -> Option<String> {
    let url = azure_core::Url::parse(endpoint).ok()?;
    let (account, rest) = url.host_str()?.split_once('.')?;
    rest.starts_with("blob.").then(|| account.to_string())
}
