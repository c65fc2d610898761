//! Application state shared by all handlers.

use crate::clock::Clock;
use crate::services::IngestionService;
use harvest_core::Config;
use harvest_db::DocumentStore;
use harvest_storage::BlobStore;
use std::sync::Arc;

/// Store clients are built once at startup and shared across requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub blob_store: Arc<dyn BlobStore>,
    pub document_store: Arc<dyn DocumentStore>,
    pub ingestion: IngestionService,
}

impl AppState {
    pub fn new(
        config: Config,
        blob_store: Arc<dyn BlobStore>,
        document_store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let ingestion = IngestionService::new(
            blob_store.clone(),
            document_store.clone(),
            clock,
            config.document_collection.clone(),
        );
        Self {
            config,
            blob_store,
            document_store,
            ingestion,
        }
    }
}
