//! Document store implementations
//!
//! `document` holds the trait and error type shared by the backends: `postgres` keeps each
//! document as a JSONB row, `memory` keeps them in process for development.
//
// Trait, write type and errors
mod document;
//
// Backends
mod memory;
mod postgres;

pub use document::{DocumentResult, DocumentStore, DocumentStoreError, DocumentWrite};
pub use memory::MemoryDocumentStore;
pub use postgres::PostgresDocumentStore;

use harvest_core::{Config, DocumentBackend};
use sqlx::PgPool;
use std::sync::Arc;

/// Create a document store based on configuration.
///
/// `pool` must be provided when the postgres backend is selected.
pub fn create_document_store(
    config: &Config,
    pool: Option<PgPool>,
) -> DocumentResult<Arc<dyn DocumentStore>> {
    match config.document_backend {
        DocumentBackend::Postgres => {
            let pool = pool.ok_or_else(|| {
                DocumentStoreError::ConfigError(
                    "postgres backend selected but no connection pool was created".to_string(),
                )
            })?;
            Ok(Arc::new(PostgresDocumentStore::new(pool)))
        }
        DocumentBackend::Memory => Ok(Arc::new(MemoryDocumentStore::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_builds_memory_store() {
        let store = create_document_store(&Config::default(), None).unwrap();
        assert_eq!(store.backend_type(), DocumentBackend::Memory);
    }

    #[test]
    fn test_factory_requires_pool_for_postgres() {
        let config = Config {
            document_backend: DocumentBackend::Postgres,
            ..Config::default()
        };
        let result = create_document_store(&config, None);
        assert!(matches!(result, Err(DocumentStoreError::ConfigError(_))));
    }
}
