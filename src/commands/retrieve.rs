//! Retrieve command - reads the stored image text back into a local file

use anyhow::{Context, Result};

use crate::config::Config;
use crate::contracts::ImageStoreService;

pub async fn execute(config: &Config) -> Result<()> {
    let service = ImageStoreService::connect(config).await?;

    tracing::info!(
        account = ?service.account(),
        "Retrieving stored image"
    );

    let image_text = service.retrieve_image().await?;

    tokio::fs::write(&config.images.output_path, &image_text)
        .await
        .with_context(|| format!("write image file {}", config.images.output_path))?;

    tracing::info!(
        path = %config.images.output_path,
        bytes = image_text.len(),
        "Image retrieved and saved successfully"
    );
    Ok(())
}
