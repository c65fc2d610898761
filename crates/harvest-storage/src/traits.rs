//! Blob storage abstraction trait

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Per-object write options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    pub content_type: String,
    pub public_read: bool,
}

impl SaveOptions {
    /// Publicly readable object with the given MIME type.
    pub fn public(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            public_read: true,
        }
    }
}

/// Blob storage abstraction trait
///
/// Objects are immutable once written and readable at a URL that is a pure function of
/// the store's location and the key, so callers never need a second round trip to learn it.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `data` at `key` and return the object's public URL.
    async fn save(&self, key: &str, data: Vec<u8>, options: &SaveOptions)
        -> StorageResult<String>;

    /// Public URL for `key`, whether or not the object exists yet.
    fn public_url(&self, key: &str) -> String;

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
