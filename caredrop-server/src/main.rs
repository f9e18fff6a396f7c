use anyhow::{Context, Result};
use caredrop_server::ServerConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env().context("Failed to load server configuration")?;
    let addr = config.addr();

    let app = caredrop_server::build(&config).await;

    tracing::info!(
        backend = config.storage.backend(),
        container = %config.container,
        "[caredrop] listening on http://{addr}"
    );

    app.listen(addr).await
}
