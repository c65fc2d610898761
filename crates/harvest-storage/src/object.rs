use crate::traits::{BlobStore, SaveOptions, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{Attribute, Attributes, GetOptions, ObjectStore, PutOptions, PutPayload};
use std::sync::Arc;

/// Object storage implementation (Google Cloud Storage, S3 and S3-compatible providers)
///
/// Public visibility of uploaded objects is governed by the bucket policy; the URL
/// returned from `save` is the bucket's public address for the key.
#[derive(Clone)]
pub struct ObjectBlobStore {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    public_base_url: String,
    backend: StorageBackend,
}

impl ObjectBlobStore {
    /// Google Cloud Storage bucket, credentials from the environment
    /// (`GOOGLE_SERVICE_ACCOUNT`, `GOOGLE_APPLICATION_CREDENTIALS`, ...).
    ///
    /// Objects are served from `https://storage.googleapis.com/{bucket}/{key}`.
    pub fn gcs(bucket: String) -> StorageResult<Self> {
        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket.clone())
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        let public_base_url = format!("https://storage.googleapis.com/{}", bucket);

        Ok(Self::with_store(
            Arc::new(store),
            bucket,
            public_base_url,
            StorageBackend::Gcs,
        ))
    }

    /// S3 bucket
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn s3(bucket: String, region: String, endpoint_url: Option<String>) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        // Path-style for S3-compatible providers: {endpoint}/{bucket}/{key}
        let public_base_url = match endpoint_url {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), bucket),
            None => format!("https://{}.s3.{}.amazonaws.com", bucket, region),
        };

        Ok(Self::with_store(
            Arc::new(store),
            bucket,
            public_base_url,
            StorageBackend::S3,
        ))
    }

    /// Wrap an already-built object store.
    pub fn with_store(
        store: Arc<dyn ObjectStore>,
        bucket: String,
        public_base_url: String,
        backend: StorageBackend,
    ) -> Self {
        Self {
            store,
            bucket,
            public_base_url,
            backend,
        }
    }
}

#[async_trait]
impl BlobStore for ObjectBlobStore {
    async fn save(
        &self,
        key: &str,
        data: Vec<u8>,
        options: &SaveOptions,
    ) -> StorageResult<String> {
        let size = data.len() as u64;
        let location = Path::from(key);

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, options.content_type.clone().into());
        let put_options = PutOptions {
            attributes,
            ..Default::default()
        };

        let start = std::time::Instant::now();

        self.store
            .put_opts(&location, PutPayload::from(Bytes::from(data)), put_options)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object storage upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        let url = self.public_url(key);

        tracing::info!(
            backend = %self.backend,
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            content_type = %options.content_type,
            public_read = options.public_read,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object storage upload successful"
        );

        Ok(url)
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), key)
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let location = Path::from(key);
        let options = GetOptions {
            head: true,
            ..Default::default()
        };

        match self.store.get_opts(&location, options).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        self.backend
    }
}
