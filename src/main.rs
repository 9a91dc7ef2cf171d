mod commands;
mod config;
mod contracts;

use clap::{Parser, Subcommand};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "image-on-chain", version, about = "Store and retrieve text-encoded images through the ImageStore contract")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read the local image file and store it on chain
    Store,
    /// Retrieve the stored image and write it to disk
    Retrieve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_on_chain=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    tracing::debug!(
        rpc_url = %config.rpc_url(),
        artifact = %config.artifact_path,
        "Connecting to development chain"
    );

    match cli.command {
        Command::Store => commands::store::execute(&config).await,
        Command::Retrieve => commands::retrieve::execute(&config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["image-on-chain", "store"]).unwrap();
        assert!(matches!(cli.command, Command::Store));

        let cli = Cli::try_parse_from(["image-on-chain", "retrieve"]).unwrap();
        assert!(matches!(cli.command, Command::Retrieve));
    }

    #[test]
    fn test_cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["image-on-chain", "deploy"]).is_err());
    }
}
