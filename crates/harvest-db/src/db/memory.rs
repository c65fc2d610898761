use super::document::{
    DocumentResult, DocumentStore, DocumentStoreError, DocumentWrite,
};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use harvest_core::DocumentBackend;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

type Collection = HashMap<String, Map<String, JsonValue>>;

/// In-process document store
///
/// Nothing survives a restart. Intended for local development and tests.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one document, if present.
    pub async fn document(&self, collection: &str, doc_id: &str) -> Option<JsonValue> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .and_then(|docs| docs.get(doc_id))
            .map(|data| JsonValue::Object(data.clone()))
    }

    /// Number of documents in a collection.
    pub async fn len(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, |docs| docs.len())
    }

    pub async fn is_empty(&self, collection: &str) -> bool {
        self.len(collection).await == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn add(&self, collection: &str, document: DocumentWrite) -> DocumentResult<String> {
        let id = Uuid::new_v4().simple().to_string();

        let mut data = document.data;
        if let Some(field) = document.server_timestamp_field {
            let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
            data.insert(field, JsonValue::String(now));
        }

        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data);

        tracing::debug!(collection = %collection, id = %id, "Memory document added");
        Ok(id)
    }

    async fn set(
        &self,
        collection: &str,
        doc_id: &str,
        data: JsonValue,
        merge: bool,
    ) -> DocumentResult<()> {
        let JsonValue::Object(fields) = data else {
            return Err(DocumentStoreError::InvalidDocument(
                "document data must be a JSON object".to_string(),
            ));
        };

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        match docs.get_mut(doc_id) {
            Some(existing) if merge => existing.extend(fields),
            _ => {
                docs.insert(doc_id.to_string(), fields);
            }
        }

        Ok(())
    }

    async fn ping(&self) -> DocumentResult<()> {
        Ok(())
    }

    fn backend_type(&self) -> DocumentBackend {
        DocumentBackend::Memory
    }
}
