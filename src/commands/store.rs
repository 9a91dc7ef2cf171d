//! Store command - submits the local image text to the contract

use anyhow::{Context, Result};

use crate::config::Config;
use crate::contracts::ImageStoreService;

pub async fn execute(config: &Config) -> Result<()> {
    let service = ImageStoreService::connect(config).await?;

    let image_text = tokio::fs::read_to_string(&config.images.input_path)
        .await
        .with_context(|| format!("read image file {}", config.images.input_path))?;

    tracing::info!(
        path = %config.images.input_path,
        bytes = image_text.len(),
        from = ?service.account(),
        "Storing image on chain"
    );

    let tx_hash = service.store_image(image_text).await?;

    tracing::info!(tx_hash = ?tx_hash, "New image stored successfully");
    Ok(())
}
