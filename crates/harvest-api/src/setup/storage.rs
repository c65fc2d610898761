//! Storage setup and initialization

use anyhow::Result;
use harvest_core::Config;
use harvest_storage::{create_blob_store, BlobStore};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn BlobStore>> {
    tracing::info!("Initializing blob storage...");
    let storage = create_blob_store(config).await?;
    tracing::info!(
        backend = %storage.backend_type(),
        bucket = ?config.storage_bucket,
        "Blob storage initialized successfully"
    );
    Ok(storage)
}
