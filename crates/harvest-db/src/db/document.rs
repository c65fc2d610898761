use async_trait::async_trait;
use harvest_core::DocumentBackend;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

/// Document store errors
///
/// Variants follow the failure classes callers need to tell apart; each keeps the
/// backend's native diagnostic code (a Postgres SQLSTATE, for instance) when there is one.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    /// The database, collection or table does not exist.
    #[error("{message}")]
    NotFound {
        message: String,
        code: Option<String>,
    },

    #[error("{message}")]
    PermissionDenied {
        message: String,
        code: Option<String>,
    },

    /// The store could not be reached (pool exhausted, connection refused, ...).
    #[error("{message}")]
    Unavailable {
        message: String,
        code: Option<String>,
    },

    #[error("{message}")]
    Backend {
        message: String,
        code: Option<String>,
    },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DocumentStoreError {
    /// Native code when the backend supplied one, otherwise the failure class name.
    pub fn code(&self) -> Option<String> {
        match self {
            DocumentStoreError::NotFound { code, .. } => {
                Some(code.clone().unwrap_or_else(|| "NOT_FOUND".to_string()))
            }
            DocumentStoreError::PermissionDenied { code, .. } => {
                Some(code.clone().unwrap_or_else(|| "PERMISSION_DENIED".to_string()))
            }
            DocumentStoreError::Unavailable { code, .. } => {
                Some(code.clone().unwrap_or_else(|| "UNAVAILABLE".to_string()))
            }
            DocumentStoreError::Backend { code, .. } => code.clone(),
            DocumentStoreError::InvalidDocument(_) => Some("INVALID_ARGUMENT".to_string()),
            DocumentStoreError::ConfigError(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DocumentStoreError::NotFound { .. })
    }
}

/// Result type for document store operations
pub type DocumentResult<T> = Result<T, DocumentStoreError>;

/// A new document plus the fields the store fills with its own clock.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentWrite {
    pub data: Map<String, JsonValue>,
    pub server_timestamp_field: Option<String>,
}

impl DocumentWrite {
    /// Build from any value that serializes to a JSON object.
    pub fn from_serialize<T: Serialize>(value: &T) -> DocumentResult<Self> {
        match serde_json::to_value(value) {
            Ok(JsonValue::Object(data)) => Ok(Self {
                data,
                server_timestamp_field: None,
            }),
            Ok(other) => Err(DocumentStoreError::InvalidDocument(format!(
                "expected a JSON object, got {}",
                other
            ))),
            Err(e) => Err(DocumentStoreError::InvalidDocument(e.to_string())),
        }
    }

    /// Ask the store to set `field` to its own write time.
    pub fn with_server_timestamp(mut self, field: impl Into<String>) -> Self {
        self.server_timestamp_field = Some(field.into());
        self
    }
}

/// Document store abstraction trait
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document with a store-assigned id and return the id.
    async fn add(&self, collection: &str, document: DocumentWrite) -> DocumentResult<String>;

    /// Write `data` at a fixed id. With `merge`, existing top-level fields not present in
    /// `data` are kept; otherwise the document is replaced.
    async fn set(
        &self,
        collection: &str,
        doc_id: &str,
        data: JsonValue,
        merge: bool,
    ) -> DocumentResult<()>;

    /// Cheap reachability check for readiness probes.
    async fn ping(&self) -> DocumentResult<()>;

    fn backend_type(&self) -> DocumentBackend;
}
