//! Database setup and initialization

use anyhow::{Context, Result};
use harvest_core::{Config, DocumentBackend};
use harvest_db::{create_document_store, DocumentStore};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Connect and migrate when the postgres document backend is selected.
pub async fn setup_database(config: &Config) -> Result<Option<PgPool>> {
    if config.document_backend != DocumentBackend::Postgres {
        tracing::info!(
            backend = %config.document_backend,
            "Document store does not use a database connection"
        );
        return Ok(None);
    }

    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set for the postgres document backend")?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database connected successfully"
    );

    // Run pending migrations on startup (path: workspace migrations/ from crate root)
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;
    migrator
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

pub fn setup_document_store(
    config: &Config,
    pool: Option<PgPool>,
) -> Result<Arc<dyn DocumentStore>> {
    let store = create_document_store(config, pool)?;
    tracing::info!(
        backend = %store.backend_type(),
        collection = %config.document_collection,
        "Document store initialized"
    );
    Ok(store)
}
