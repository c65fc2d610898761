//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::clock::SystemClock;
use crate::state::AppState;
use anyhow::{Context, Result};
use harvest_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Telemetry first so configuration problems are logged
    crate::telemetry::init_telemetry(config.log_json)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    config.validate().context("Configuration validation failed")?;
    tracing::info!(
        environment = %config.environment,
        storage_backend = %config.storage_backend,
        document_backend = %config.document_backend,
        collection = %config.document_collection,
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let blob_store = storage::setup_storage(&config).await?;
    let document_store = database::setup_document_store(&config, pool)?;

    let state = Arc::new(AppState::new(
        config.clone(),
        blob_store,
        document_store,
        Arc::new(SystemClock),
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
