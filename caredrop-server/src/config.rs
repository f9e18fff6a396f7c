use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use caredrop_axum::GatewayConfig;
use caredrop_blob::{BlobConfig, S3Config, DEFAULT_CONTAINER};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7071;
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 100;

/// Which backend to build and the credentials it was given
#[derive(Clone)]
pub enum StorageSettings {
    /// `None` when neither connection-string variable is set
    Azure { connection_string: Option<String> },
    /// `None` when any of the S3 variables is missing
    S3(Option<S3Config>),
    Memory,
}

impl StorageSettings {
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Azure { .. } => "azure",
            Self::S3(_) => "s3",
            Self::Memory => "memory",
        }
    }

    pub fn is_configured(&self) -> bool {
        match self {
            Self::Azure { connection_string } => connection_string.is_some(),
            Self::S3(config) => config.is_some(),
            Self::Memory => true,
        }
    }
}

impl fmt::Debug for StorageSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageSettings")
            .field("backend", &self.backend())
            .field("configured", &self.is_configured())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub container: String,
    pub max_file_size_mb: u64,
    pub storage: StorageSettings,
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage = match get("CAREDROP_STORAGE_BACKEND")
            .unwrap_or_else(|| "azure".to_string())
            .to_lowercase()
            .as_str()
        {
            "azure" => StorageSettings::Azure {
                connection_string: get("AZURE_STORAGE_CONNECTION_STRING")
                    .or_else(|| get("AzureWebJobsStorage")),
            },
            "s3" => StorageSettings::S3(s3_config(&get)),
            "memory" => StorageSettings::Memory,
            other => bail!("Unknown CAREDROP_STORAGE_BACKEND '{other}' (expected azure, s3 or memory)"),
        };

        Ok(Self {
            host: get("HTTP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: env_var_or(&get, "HTTP_PORT", DEFAULT_PORT),
            container: get("HEALTHCARE_CONTAINER_NAME")
                .unwrap_or_else(|| DEFAULT_CONTAINER.to_string()),
            max_file_size_mb: env_var_or(&get, "CAREDROP_MAX_FILE_SIZE_MB", DEFAULT_MAX_FILE_SIZE_MB),
            storage,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new().with_max_file_size_mb(self.max_file_size_mb)
    }

    pub fn blob_config(&self) -> BlobConfig {
        let gateway = self.gateway_config();
        BlobConfig::new()
            .with_container(self.container.clone())
            .with_max_blob_bytes(gateway.max_file_bytes)
    }
}

fn s3_config<G>(get: &G) -> Option<S3Config>
where
    G: Fn(&str) -> Option<String>,
{
    let config = S3Config::new(
        get("S3_ENDPOINT_URL")?,
        get("S3_ACCESS_KEY_ID")?,
        get("S3_SECRET_ACCESS_KEY")?,
    );
    Some(match get("S3_REGION") {
        Some(region) => config.with_region(region),
        None => config,
    })
}

/// Parse `key` or fall back to `default` when unset or unparseable
fn env_var_or<G, T>(get: &G, key: &str, default: T) -> T
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
{
    get(key).and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
