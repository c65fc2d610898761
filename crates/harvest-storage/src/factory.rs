#[cfg(feature = "storage-local")]
use crate::LocalBlobStore;
#[cfg(feature = "storage-object")]
use crate::ObjectBlobStore;
use crate::{BlobStore, StorageBackend, StorageError, StorageResult};
use harvest_core::Config;
use std::sync::Arc;

/// Create a blob storage backend based on configuration
pub async fn create_blob_store(config: &Config) -> StorageResult<Arc<dyn BlobStore>> {
    match config.storage_backend {
        #[cfg(feature = "storage-object")]
        StorageBackend::Gcs => {
            let bucket = config.storage_bucket.clone().ok_or_else(|| {
                StorageError::ConfigError("STORAGE_BUCKET not configured".to_string())
            })?;

            Ok(Arc::new(ObjectBlobStore::gcs(bucket)?))
        }

        #[cfg(feature = "storage-object")]
        StorageBackend::S3 => {
            let bucket = config.storage_bucket.clone().ok_or_else(|| {
                StorageError::ConfigError("STORAGE_BUCKET not configured".to_string())
            })?;
            let region = config.s3_region.clone().ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;

            Ok(Arc::new(ObjectBlobStore::s3(
                bucket,
                region,
                config.s3_endpoint.clone(),
            )?))
        }

        #[cfg(not(feature = "storage-object"))]
        StorageBackend::Gcs | StorageBackend::S3 => Err(StorageError::ConfigError(
            "Object storage backends not available (storage-object feature not enabled)"
                .to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.local_storage_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            Ok(Arc::new(LocalBlobStore::new(base_path, base_url).await?))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-local", feature = "storage-object"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_factory_builds_local_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            local_storage_path: Some(dir.path().display().to_string()),
            local_storage_base_url: Some("http://localhost:8080/blobs".to_string()),
            ..Config::default()
        };

        let store = create_blob_store(&config).await.unwrap();
        assert_eq!(store.backend_type(), StorageBackend::Local);
    }

    #[tokio::test]
    async fn test_factory_rejects_gcs_without_bucket() {
        let config = Config {
            storage_backend: StorageBackend::Gcs,
            storage_bucket: None,
            ..Config::default()
        };

        let result = create_blob_store(&config).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_factory_builds_s3_store() {
        let config = Config {
            storage_backend: StorageBackend::S3,
            storage_bucket: Some("veg-images".to_string()),
            s3_region: Some("us-east-1".to_string()),
            ..Config::default()
        };

        let store = create_blob_store(&config).await.unwrap();
        assert_eq!(store.backend_type(), StorageBackend::S3);
        assert_eq!(
            store.public_url("vegetables/x_1.png"),
            "https://veg-images.s3.us-east-1.amazonaws.com/vegetables/x_1.png"
        );
    }
}
