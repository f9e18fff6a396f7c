use std::path::PathBuf;
use std::process::ExitCode;

use caredrop_client::UploadClient;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// Upload one file to the caredrop gateway and print the result.
#[derive(Parser, Debug)]
#[command(name = "caredrop-client", version, about)]
struct Cli {
    /// Upload endpoint, e.g. https://gateway.example.org/upload
    api_url: String,

    /// Local file to send
    file_path: PathBuf,

    /// Sent as the Ocp-Apim-Subscription-Key header
    #[arg(env = "CAREDROP_API_KEY")]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            println!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    let client = UploadClient::new(cli.api_key)?;

    println!("Uploading {} to {}...", cli.file_path.display(), cli.api_url);
    let outcome = client.upload(&cli.api_url, &cli.file_path).await?;
    println!("{}", outcome.render());

    Ok(outcome.exit_code())
}
